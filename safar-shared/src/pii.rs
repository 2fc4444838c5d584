use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps secrets such as the bearer token so `{:?}` and `{}` in tracing
/// macros never print them. Serialization still writes the real value.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Masked<String> {
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hidden_in_debug() {
        let token = Masked("eyJhbGciOi.secret".to_string());
        assert_eq!(format!("{:?}", token), "********");
        assert_eq!(token.to_string(), "********");
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
        assert!(!token.is_blank());
        assert!(Masked("  ".to_string()).is_blank());
    }
}
