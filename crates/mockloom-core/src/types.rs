use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! newtype_string {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the inner string as a str slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(ServiceName, "The name a Service is declared under in a scenario document.");
newtype_string!(ScenarioName, "The name a Scenario is declared under in a scenario document.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_from_str() {
        let name = ServiceName::from("search");
        assert_eq!(name.as_str(), "search");
        assert_eq!(&*name, "search");
    }

    #[test]
    fn newtype_display() {
        let name = ScenarioName::new("cap");
        assert_eq!(format!("{name}"), "cap");
    }

    #[test]
    fn newtype_serde_roundtrip() {
        let name = ScenarioName::new("rt");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"rt\"");
        let back: ScenarioName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn newtype_as_hashmap_key() {
        use std::collections::HashMap;
        let mut map: HashMap<ServiceName, u16> = HashMap::new();
        map.insert(ServiceName::new("search"), 8080);
        assert_eq!(map.get("search").copied(), Some(8080));
    }
}
