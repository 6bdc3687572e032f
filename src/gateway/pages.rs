//! Static HTML served by the gateway: an index describing the API and a
//! self-contained browser test page.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>CivicBot API</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .container { max-width: 800px; margin: 0 auto; }
        .endpoint { background: #f5f5f5; padding: 15px; margin: 10px 0; border-radius: 5px; }
        code { background: #eee; padding: 2px 5px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>CivicBot API</h1>
        <p>Chatbot for civic issues like broken roads, drainage, etc.</p>

        <div class="endpoint">
            <h3>GET /health</h3>
            <p>Health check endpoint</p>
            <code>curl http://localhost:8000/health</code>
        </div>

        <div class="endpoint">
            <h3>POST /api/chat</h3>
            <p>Main chat endpoint (use POST method)</p>
            <code>curl -X POST http://localhost:8000/api/chat -H "Content-Type: application/json" -d '{"message": "pothole on main street"}'</code>
        </div>

        <div class="endpoint">
            <h3>POST /api/clear</h3>
            <p>Clear chat history</p>
            <code>curl -X POST http://localhost:8000/api/clear -H "Content-Type: application/json" -d '{"user_id": "test123"}'</code>
        </div>
    </div>
</body>
</html>
"#;

pub const TEST_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Test CivicBot</title>
    <script>
        async function sendMessage() {
            const message = document.getElementById('message').value;
            const responseDiv = document.getElementById('response');

            responseDiv.innerHTML = 'Sending...';

            try {
                const response = await fetch('/api/chat', {
                    method: 'POST',
                    headers: {
                        'Content-Type': 'application/json',
                    },
                    body: JSON.stringify({
                        message: message,
                        user_id: 'test_user'
                    })
                });

                const data = await response.json();

                if (data.success) {
                    responseDiv.innerHTML = `<strong>Bot:</strong> ${data.response}`;
                } else {
                    responseDiv.innerHTML = `<strong>Error:</strong> ${data.error}`;
                }
            } catch (error) {
                responseDiv.innerHTML = `<strong>Network Error:</strong> ${error}`;
            }
        }
    </script>
</head>
<body>
    <h1>Test CivicBot</h1>
    <input type="text" id="message" placeholder="Type your civic issue..." style="width: 300px; padding: 10px;">
    <button onclick="sendMessage()" style="padding: 10px 20px;">Send</button>
    <div id="response" style="margin-top: 20px; padding: 10px; border: 1px solid #ccc; min-height: 50px;"></div>

    <h3>Example messages:</h3>
    <ul>
        <li>There's a big pothole on Main Street</li>
        <li>Drainage is clogged in my area</li>
        <li>Garbage hasn't been collected for 3 days</li>
        <li>Street light is not working</li>
    </ul>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_documents_all_endpoints() {
        assert!(INDEX_HTML.contains("GET /health"));
        assert!(INDEX_HTML.contains("POST /api/chat"));
        assert!(INDEX_HTML.contains("POST /api/clear"));
    }

    #[test]
    fn test_page_posts_to_chat_endpoint() {
        assert!(TEST_HTML.contains("fetch('/api/chat'"));
        assert!(TEST_HTML.contains("user_id: 'test_user'"));
    }
}
