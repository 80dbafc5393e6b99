use regex::{Captures, Regex};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Redacts credentials from formatted log lines.
#[derive(Debug, Clone)]
pub struct SecretScrubber {
    api_key_pattern: Regex,
    bearer_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Anthropic API keys: sk-ant-api03-...
            api_key_pattern: Regex::new(r"sk-ant-[a-zA-Z0-9_-]{8,}")?,
            bearer_pattern: Regex::new(r"Bearer\s+[a-zA-Z0-9._-]+")?,
            field_pattern: Regex::new(
                r#"(?i)(["']?(?:api_key|x-api-key|apikey|token|secret|password)["']?\s*[:=]\s*)["']?[^"'\s,}]{4,}["']?"#,
            )?,
        })
    }

    /// Scrub a message of sensitive data
    pub fn scrub(&self, message: &str) -> String {
        let scrubbed = self
            .api_key_pattern
            .replace_all(message, "[API_KEY_REDACTED]");
        let scrubbed = self
            .bearer_pattern
            .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, |caps: &Captures<'_>| format!("{}[REDACTED]", &caps[1]))
            .into_owned()
    }
}

/// `MakeWriter` wrapper that scrubs every formatted event before writing.
#[derive(Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
    scrubber: Arc<SecretScrubber>,
}

impl<M> ScrubbingMakeWriter<M> {
    pub fn new(inner: M, scrubber: Arc<SecretScrubber>) -> Self {
        Self { inner, scrubber }
    }
}

impl<'a, M> MakeWriter<'a> for ScrubbingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
            scrubber: Arc::clone(&self.scrubber),
        }
    }
}

pub struct ScrubbingWriter<W> {
    inner: W,
    scrubber: Arc<SecretScrubber>,
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(self.scrubber.scrub(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrubber() -> SecretScrubber {
        SecretScrubber::new().unwrap()
    }

    #[test]
    fn test_scrub_api_key() {
        let scrubbed = scrubber().scrub("Using key sk-ant-REDACTED");
        assert_eq!(scrubbed, "Using key [API_KEY_REDACTED]");
    }

    #[test]
    fn test_scrub_bearer_token() {
        let scrubbed = scrubber().scrub("Authorization: Bearer eyJhbGciOi.abc");
        assert!(scrubbed.contains("Bearer [TOKEN_REDACTED]"));
        assert!(!scrubbed.contains("eyJhbGciOi"));
    }

    #[test]
    fn test_scrub_named_fields() {
        let scrubbed = scrubber().scrub(r#"{"api_key": "plain-secret-value", "level": "info"}"#);
        assert!(!scrubbed.contains("plain-secret-value"));
        assert!(scrubbed.contains("[REDACTED]"));
        assert!(scrubbed.contains(r#""level": "info""#));

        let scrubbed = scrubber().scrub("password=hunter22 user=bob");
        assert_eq!(scrubbed, "password=[REDACTED] user=bob");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Phase transition from=coaching to=reflect";
        assert_eq!(scrubber().scrub(text), text);
    }

    #[test]
    fn test_writer_scrubs_output() {
        let scrubber = Arc::new(scrubber());
        let mut writer = ScrubbingWriter {
            inner: Vec::new(),
            scrubber,
        };
        write!(writer, "key=sk-ant-REDACTED").unwrap();
        assert_eq!(String::from_utf8(writer.inner).unwrap(), "key=[API_KEY_REDACTED]");
    }
}
