//! Deterministic stand-in replies for when the remote model is unreachable
//! or returns nothing. Keyed by the conversation's message count, the table
//! mirrors the five-stage script the model itself is instructed to follow,
//! so the conversation keeps advancing with zero connectivity.

/// Scripted reply for the given 1-based message ordinal. Total over all
/// inputs: ordinals past the script (and the unreachable 0) get the generic
/// acknowledgment.
pub fn fallback_reply(message_count: u32) -> &'static str {
    match message_count {
        1 => {
            "I'm here to help you report civic issues. What problem would you like to report? \
             (e.g., pothole, garbage overflow, drainage issues)"
        }
        2 => {
            "Thank you for telling me about that. Where is this issue located? \
             Please provide the area or street name."
        }
        3 => "I see. Can you describe the problem in more detail? How long has this issue been happening?",
        4 => {
            "That's helpful information. Can you provide your contact details (name and phone) \
             so authorities can follow up?"
        }
        _ => "Thank you for your input. Your civic issue report is being processed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_one_through_four_are_distinct() {
        let replies: Vec<&str> = (1..=4).map(fallback_reply).collect();
        for (i, a) in replies.iter().enumerate() {
            for b in &replies[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn stage_intents_match_script() {
        assert!(fallback_reply(1).contains("What problem would you like to report"));
        assert!(fallback_reply(2).contains("Where is this issue located"));
        assert!(fallback_reply(3).contains("more detail"));
        assert!(fallback_reply(4).contains("contact details"));
    }

    #[test]
    fn everything_past_the_script_gets_the_default() {
        let default = fallback_reply(5);
        assert!(default.contains("being processed"));
        assert_eq!(fallback_reply(6), default);
        assert_eq!(fallback_reply(100), default);
        assert_eq!(fallback_reply(u32::MAX), default);
    }

    #[test]
    fn is_pure() {
        assert_eq!(fallback_reply(3), fallback_reply(3));
    }
}
