use serde::Serialize;
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub(crate) fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            // Short form, enough to tell entries apart in logs.
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                f.write_str(&simple[..8])
            }
        }
    };
}

entity_id!(
    /// Handle of a `Manager`.
    ManagerId
);
entity_id!(
    /// Handle of a `Project`. Stored by tasks as their back-reference.
    ProjectId
);
entity_id!(
    /// Handle of a `Task`.
    TaskId
);
