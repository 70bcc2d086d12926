//! Super-admin role enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of a super-admin account.
///
/// This enumeration corresponds to the `admin_role` PostgreSQL enum. The role
/// is stored with every super-admin but carries no finer-grained policy:
/// any active super-admin may perform every admin-scoped operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AdminRole"]
pub enum AdminRole {
    /// Regular administrative account.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    #[default]
    Admin,

    /// Elevated account that may manage other super-admins.
    #[db_rename = "superuser"]
    #[serde(rename = "superuser")]
    #[strum(serialize = "superuser")]
    Superuser,
}

impl AdminRole {
    /// Returns whether this role may manage other super-admin accounts.
    #[inline]
    pub fn is_superuser(self) -> bool {
        matches!(self, AdminRole::Superuser)
    }
}
