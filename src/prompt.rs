//! Behavioral preamble for the civic-report conversation.
//!
//! The preamble instructs the model to walk the five-stage script
//! (greet → issue → location → description → contact → confirm). It is a
//! constant: not reloaded at runtime, and prepended to every outbound turn.

pub const SYSTEM_PROMPT: &str = "\
You are a Civic Assistance Chatbot that helps users report civic issues.

YOUR CONVERSATION FLOW:
1. First message: Greet and ask what civic issue they want to report
2. Second message: Once they mention an issue, ask for location details
3. Third message: Ask for a detailed description of the problem
4. Fourth message: Ask for contact information (optional but helpful)
5. Final message: Confirm the report and provide a reference number

ACCEPTABLE CIVIC ISSUES:
- Road issues: potholes, broken roads, road repairs, cracks
- Drainage problems: clogged drains, flooding, water logging
- Waste management: garbage collection, sanitation, overflowing bins
- Public utilities: street lights, water supply, street cleanliness
- Public transport: bus stops, traffic problems, transportation
- Public infrastructure: parks, public toilets, public facilities
- Construction and building issues
- Public safety and emergency services

IMPORTANT RULES:
- Keep responses SHORT and FOCUSED (2-3 sentences max)
- Ask ONE question at a time
- Remember what the user already told you - DON'T ask for it again
- If the query is not civic-related, politely redirect them
- When you have all info, provide a confirmation with a reference number like: \"REF-\" + timestamp
- Always be helpful, professional, and conversational";

/// Build the outbound prompt for one turn: preamble, the user's text, and a
/// note giving the 1-based ordinal of this message within the conversation.
pub fn compose_turn(text: &str, ordinal: u32) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\nUser message: {text}\n\nNote: This is message #{ordinal} in the conversation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_includes_preamble_and_text() {
        let prompt = compose_turn("pothole on Main St", 1);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("User message: pothole on Main St"));
    }

    #[test]
    fn compose_carries_ordinal() {
        let prompt = compose_turn("near the library", 2);
        assert!(prompt.ends_with("This is message #2 in the conversation."));
    }

    #[test]
    fn preamble_names_all_five_stages() {
        for stage in ["First message", "Second message", "Third message", "Fourth message", "Final message"] {
            assert!(SYSTEM_PROMPT.contains(stage), "missing stage: {stage}");
        }
    }
}
