use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub hired_at: NaiveDate,
    pub status: StaffStatus,
    /// Cinema the member is assigned to.
    pub location_id: String,
}

impl Staff {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::CinemaAdminError::validation(
                "name",
                "staff name must not be empty",
            ));
        }
        if self.role.trim().is_empty() {
            return Err(crate::CinemaAdminError::validation(
                "role",
                "role must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_role_is_rejected() {
        let member = Staff {
            id: "s_001".to_string(),
            name: "Lê Văn C".to_string(),
            role: "  ".to_string(),
            email: "clv@cinema.com".to_string(),
            phone: "0912345678".to_string(),
            hired_at: NaiveDate::from_ymd_opt(2019, 1, 20).unwrap(),
            status: StaffStatus::Inactive,
            location_id: "c_dn_003".to_string(),
        };
        assert!(member.validate().is_err());
    }
}
