use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("media source cannot be empty")]
    Empty,

    #[error("media source is not a valid url or path: {0}")]
    Invalid(String),
}

/// Location of an image or audio clip referenced by a challenge.
///
/// The practice API returns either absolute URLs or server-relative paths
/// (`/media/audio/hola.mp3`); relative paths are resolved against the API origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaSrc {
    Absolute(Url),
    Relative(String),
}

impl MediaSrc {
    /// # Errors
    ///
    /// Returns `MediaError::Empty` for blank input and `MediaError::Invalid`
    /// for strings that are neither an http(s) URL nor a path.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MediaError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(MediaError::Empty);
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "data" | "blob") => {
                Ok(Self::Absolute(url))
            }
            Ok(_) => Err(MediaError::Invalid(raw.to_string())),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                if raw.contains(char::is_whitespace) {
                    Err(MediaError::Invalid(raw.to_string()))
                } else {
                    Ok(Self::Relative(raw.to_string()))
                }
            }
            Err(_) => Err(MediaError::Invalid(raw.to_string())),
        }
    }

    /// Resolves the source to an absolute URL.
    #[must_use]
    pub fn resolve(&self, origin: &Url) -> Option<Url> {
        match self {
            Self::Absolute(url) => Some(url.clone()),
            Self::Relative(path) => origin.join(path).ok(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(path) => path,
        }
    }
}

impl TryFrom<String> for MediaSrc {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MediaSrc> for String {
    fn from(value: MediaSrc) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_and_relative() {
        let abs = MediaSrc::parse("https://cdn.example.com/a.mp3").unwrap();
        assert!(matches!(abs, MediaSrc::Absolute(_)));
        let rel = MediaSrc::parse("/media/a.mp3").unwrap();
        assert_eq!(rel, MediaSrc::Relative("/media/a.mp3".into()));
    }

    #[test]
    fn rejects_blank_and_odd_schemes() {
        assert_eq!(MediaSrc::parse("  "), Err(MediaError::Empty));
        assert!(matches!(
            MediaSrc::parse("ftp://host/a.mp3"),
            Err(MediaError::Invalid(_))
        ));
    }

    #[test]
    fn resolves_relative_against_origin() {
        let origin = Url::parse("https://api.example.com/api/").unwrap();
        let rel = MediaSrc::parse("/media/hola.mp3").unwrap();
        assert_eq!(
            rel.resolve(&origin).unwrap().as_str(),
            "https://api.example.com/media/hola.mp3"
        );
    }
}
