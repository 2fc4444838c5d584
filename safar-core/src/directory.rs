use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use safar_shared::Masked;

use crate::repository::Endpoint;

/// Simple named records managed through list + modal CRUD screens.
pub trait DirectoryRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    const ENDPOINT: Endpoint;
    const LABEL: &'static str;

    fn id(&self) -> Option<i64>;

    fn display_name(&self) -> &str;

    /// Stamps the record with the organization it is written under.
    fn scope_to(&mut self, organization: i64);

    fn validate(&self) -> Result<(), String> {
        if self.display_name().trim().is_empty() {
            return Err(format!("{} name is required", Self::LABEL));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub group_type: String,
    #[serde(default)]
    pub organization: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl DirectoryRecord for DiscountGroup {
    const ENDPOINT: Endpoint = Endpoint::DiscountGroups;
    const LABEL: &'static str = "Discount group";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn scope_to(&mut self, organization: i64) {
        self.organization = Some(organization);
    }
}

/// Organizations are the scope themselves, so writes are not re-scoped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl DirectoryRecord for Organization {
    const ENDPOINT: Endpoint = Endpoint::Organizations;
    const LABEL: &'static str = "Organization";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn scope_to(&mut self, _organization: i64) {}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub organization: Option<i64>,
}

impl DirectoryRecord for Agency {
    const ENDPOINT: Endpoint = Endpoint::Agencies;
    const LABEL: &'static str = "Agency";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn scope_to(&mut self, organization: i64) {
        self.organization = Some(organization);
    }
}

/// A partner login (backend user). The password is only sent on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Partner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub organizations: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Masked<String>>,
}

impl DirectoryRecord for Partner {
    const ENDPOINT: Endpoint = Endpoint::Users;
    const LABEL: &'static str = "Partner";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.username
    }

    fn scope_to(&mut self, organization: i64) {
        if !self.organizations.contains(&organization) {
            self.organizations.push(organization);
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Partner username is required".to_string());
        }
        if self.id.is_none() && self.password.as_ref().map_or(true, |p| p.is_blank()) {
            return Err("A password is required for new partners".to_string());
        }
        Ok(())
    }
}

/// Role and permission group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<i64>,
    #[serde(default)]
    pub organization: Option<i64>,
}

impl DirectoryRecord for RoleGroup {
    const ENDPOINT: Endpoint = Endpoint::Groups;
    const LABEL: &'static str = "Group";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn scope_to(&mut self, organization: i64) {
        self.organization = Some(organization);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_names_rejected() {
        let group = DiscountGroup { id: None, name: "  ".into(), group_type: String::new(), organization: None, is_active: true };
        assert_eq!(group.validate(), Err("Discount group name is required".to_string()));
    }

    #[test]
    fn test_new_partner_needs_password() {
        let mut partner: Partner = serde_json::from_value(serde_json::json!({"username": "karachi-travels"})).unwrap();
        assert!(partner.validate().is_err());

        partner.password = Some(Masked("s3cret!".into()));
        partner.scope_to(4);
        partner.scope_to(4);
        assert!(partner.validate().is_ok());
        assert_eq!(partner.organizations, vec![4]);
        assert!(partner.is_active);

        let body = serde_json::to_value(&partner).unwrap();
        assert_eq!(body["password"], "s3cret!");
        assert!(body.get("id").is_none());
    }
}
