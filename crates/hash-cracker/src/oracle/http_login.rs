use super::Oracle;
use crate::config::{DEFAULT_FAILURE_MARKER, HTTP_REQUEST_TIMEOUT_MS, HTTP_USER_AGENT};
use crate::Result;
use std::thread;
use std::time::Duration;
use tracing::{debug, instrument, trace};
use ureq::{Agent, AgentBuilder};

/// Tries candidates as the password of a single account behind an HTML login
/// form.
pub struct HttpLoginOracle {
    agent: Agent,
    url: String,
    username: String,
    failure_marker: String,
    delay: Duration,
}

// region:        --- Constructors

impl HttpLoginOracle {
    /// The agent keeps a cookie jar shared by every worker, session-bound
    /// forms see one client.
    pub fn new(url: &str, username: &str) -> Self {
        let agent = AgentBuilder::new()
            .timeout(Duration::from_millis(HTTP_REQUEST_TIMEOUT_MS))
            .user_agent(HTTP_USER_AGENT)
            .build();

        Self {
            agent,
            url: url.to_string(),
            username: username.to_string(),
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn failure_marker(mut self, marker: &str) -> Self {
        self.failure_marker = marker.to_string();
        self
    }

    /// Pause after every trial, per worker.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

// endregion:     --- Constructors

impl Oracle for HttpLoginOracle {
    fn name(&self) -> String {
        format!("http/login {}@{}", self.username, self.url)
    }

    fn target_count(&self) -> Option<usize> {
        Some(1)
    }

    #[instrument(name = "login", level = "trace", skip_all)]
    fn verify(&self, candidate: &str) -> Result<bool> {
        let outcome = self.try_login(candidate);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        outcome
    }
}

impl HttpLoginOracle {
    fn try_login(&self, candidate: &str) -> Result<bool> {
        let form = [
            ("username", self.username.as_str()),
            ("password", candidate),
            ("Login", "Login"),
        ];

        let response = match self.agent.post(&self.url).send_form(&form) {
            Ok(response) => response,
            // error pages still carry the form
            Err(ureq::Error::Status(code, response)) => {
                debug!("Receive with status: {}", code);
                response
            }
            Err(err) => return Err(err.into()),
        };

        let body = response.into_string()?;
        trace!("{} bytes body", body.len());
        Ok(is_login_success(&body, &self.failure_marker))
    }
}

/// A page showing the failure marker is a rejection; a page without any
/// login form field is a successful login.
pub fn is_login_success(body: &str, failure_marker: &str) -> bool {
    if body.contains(failure_marker) {
        return false;
    }
    !body.contains("username") && !body.contains("password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;

    /// Answers one request per connection with the given extra headers and
    /// body, and hands back the request heads it read.
    fn serve(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/login", listener.local_addr().unwrap());

        let server = thread::spawn(move || {
            let mut heads = Vec::new();
            for (headers, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut head = String::new();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                    head.push_str(&line);
                }
                let mut form = vec![0; content_length];
                reader.read_exact(&mut form).unwrap();
                heads.push(head);

                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    headers,
                    body.len(),
                    body
                )
                .unwrap();
            }
            heads
        });

        (url, server)
    }

    #[test]
    fn failure_marker_is_a_rejection() {
        let body = "<pre><br />Username and/or password incorrect.</pre>";
        assert!(!is_login_success(body, DEFAULT_FAILURE_MARKER));
    }

    #[test]
    fn page_without_form_is_a_success() {
        let body = "<p>Welcome to the password protected area admin</p>";
        // still mentions "password", not a success
        assert!(!is_login_success(body, DEFAULT_FAILURE_MARKER));

        let body = "<p>Welcome to the protected area admin</p>";
        assert!(is_login_success(body, DEFAULT_FAILURE_MARKER));
    }

    #[test]
    fn form_still_present_is_a_rejection() {
        let body = r#"<form><input name="username"><input name="password"></form>"#;
        assert!(!is_login_success(body, DEFAULT_FAILURE_MARKER));
    }

    #[test]
    fn custom_failure_marker() {
        assert!(!is_login_success(
            "Invalid credentials",
            "Invalid credentials"
        ));
        assert!(is_login_success("Dashboard", "Invalid credentials"));
    }

    #[test]
    fn session_cookie_is_kept_across_trials() {
        let rejected = "<pre><br />Username and/or password incorrect.</pre>";
        let (url, server) = serve(vec![
            ("Set-Cookie: PHPSESSID=s3ss10n; Path=/\r\n", rejected),
            ("", rejected),
            ("", "<p>Welcome to the protected area admin</p>"),
        ]);

        let oracle = HttpLoginOracle::new(&url, "admin");
        assert!(!oracle.verify("123456").unwrap());
        assert!(!oracle.verify("qwerty").unwrap());
        assert!(oracle.verify("letmein").unwrap());

        let heads = server.join().unwrap();
        assert!(!heads[0].contains("PHPSESSID"));
        assert!(heads[1].contains("PHPSESSID=s3ss10n"));
        assert!(heads[2].contains("PHPSESSID=s3ss10n"));
    }

    #[test]
    fn unreachable_server_is_an_error() {
        let oracle = HttpLoginOracle::new("http://127.0.0.1:1/login", "admin");
        assert!(matches!(oracle.verify("password"), Err(Error::Http(_))));
        assert_eq!(oracle.target_count(), Some(1));
    }
}
