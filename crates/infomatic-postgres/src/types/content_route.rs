//! Content route enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A content section an editor can be scoped to.
///
/// This enumeration corresponds to the `content_route` PostgreSQL enum. Editor
/// permissions are stored as a non-empty array of these values, and every
/// catalog endpoint is addressed by exactly one of them. The set is closed:
/// unknown section names fail to deserialize instead of silently granting
/// nothing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ContentRoute"]
pub enum ContentRoute {
    /// News coverage section.
    #[db_rename = "news"]
    #[serde(rename = "news")]
    #[strum(serialize = "news")]
    News,

    /// Long-form review articles section.
    #[db_rename = "articles"]
    #[serde(rename = "articles")]
    #[strum(serialize = "articles")]
    Articles,

    /// Gadget catalog section.
    #[db_rename = "gadget"]
    #[serde(rename = "gadget")]
    #[strum(serialize = "gadget")]
    Gadget,

    /// Mobile device catalog section.
    #[db_rename = "mobiles"]
    #[serde(rename = "mobiles")]
    #[strum(serialize = "mobiles")]
    Mobiles,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::ContentRoute;

    #[test]
    fn parses_every_section_name() {
        for route in ContentRoute::iter() {
            let name = route.to_string();
            assert_eq!(ContentRoute::from_str(&name), Ok(route));
        }
    }

    #[test]
    fn rejects_unknown_section_name() {
        assert!(ContentRoute::from_str("videos").is_err());
        assert!(ContentRoute::from_str("News").is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ContentRoute::Mobiles).unwrap();
        assert_eq!(json, "\"mobiles\"");

        let route: ContentRoute = serde_json::from_str("\"gadget\"").unwrap();
        assert_eq!(route, ContentRoute::Gadget);
    }
}
