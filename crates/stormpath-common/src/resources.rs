use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The top-level namespace that owns applications and directories.
///
/// A client resolves its tenant once at session start and treats it as
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Canonical address of the tenant.
    pub href: String,
    /// Human-readable tenant name.
    #[serde(default)]
    pub name: String,
    /// Unique tenant key.
    #[serde(default)]
    pub key: String,
}

impl Tenant {
    /// Address of this tenant's applications collection.
    #[must_use]
    pub fn applications_href(&self) -> String {
        format!("{}/applications", self.href)
    }

    /// Address of this tenant's directories collection.
    #[must_use]
    pub fn directories_href(&self) -> String {
        format!("{}/directories", self.href)
    }
}

/// Whether a resource is usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResourceStatus {
    /// The resource is active.
    #[default]
    #[serde(rename = "ENABLED", alias = "enabled", alias = "Enabled")]
    Enabled,
    /// The resource exists but rejects use.
    #[serde(rename = "DISABLED", alias = "disabled", alias = "Disabled")]
    Disabled,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "ENABLED"),
            Self::Disabled => write!(f, "DISABLED"),
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            _ => anyhow::bail!("Unknown resource status: {s}"),
        }
    }
}

/// A resource that belongs to a tenant.
///
/// The owning tenant is never part of the wire format. The client attaches
/// it after decoding a response.
pub trait TenantScoped {
    /// Associates this resource with its owning tenant.
    fn attach_tenant(&mut self, tenant: Arc<Tenant>);

    /// The owning tenant, if one has been attached.
    fn tenant(&self) -> Option<&Tenant>;
}

/// A Stormpath application.
///
/// Use the builder to describe an application to create; `href` stays empty
/// until the service assigns one.
///
/// ```
/// use stormpath_common::{Application, ResourceStatus};
///
/// let app = Application::builder()
///     .name("billing")
///     .status(ResourceStatus::Disabled)
///     .build();
///
/// let body = serde_json::to_value(&app)?;
/// assert_eq!(body["status"], "DISABLED");
/// assert!(body.get("href").is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct Application {
    /// Service-assigned address. Empty for an application not yet created.
    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Application name, unique within the tenant.
    #[builder(setter(into))]
    pub name: String,
    /// Free-form description.
    #[builder(default, setter(into))]
    #[serde(default)]
    pub description: String,
    /// Enabled or disabled.
    #[builder(default)]
    #[serde(default)]
    pub status: ResourceStatus,
    /// Owning tenant, attached after decode.
    #[builder(default, setter(skip))]
    #[serde(skip)]
    pub tenant: Option<Arc<Tenant>>,
}

impl TenantScoped for Application {
    fn attach_tenant(&mut self, tenant: Arc<Tenant>) {
        self.tenant = Some(tenant);
    }

    fn tenant(&self) -> Option<&Tenant> {
        self.tenant.as_deref()
    }
}

/// A Stormpath directory: a store of accounts and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct Directory {
    /// Service-assigned address.
    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Directory name, unique within the tenant.
    #[builder(setter(into))]
    pub name: String,
    /// Free-form description.
    #[builder(default, setter(into))]
    #[serde(default)]
    pub description: String,
    /// Enabled or disabled.
    #[builder(default)]
    #[serde(default)]
    pub status: ResourceStatus,
    /// Owning tenant, attached after decode.
    #[builder(default, setter(skip))]
    #[serde(skip)]
    pub tenant: Option<Arc<Tenant>>,
}

impl TenantScoped for Directory {
    fn attach_tenant(&mut self, tenant: Arc<Tenant>) {
        self.tenant = Some(tenant);
    }

    fn tenant(&self) -> Option<&Tenant> {
        self.tenant.as_deref()
    }
}

/// A reference to another resource by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Address of the referenced resource.
    pub href: String,
}

/// A group of accounts within a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Service-assigned address.
    #[serde(default)]
    pub href: String,
    /// Group name, unique within the directory.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Enabled or disabled.
    #[serde(default)]
    pub status: ResourceStatus,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Link>,
    /// Directory the group lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<Link>,
}

/// A user account.
///
/// The password is write-only on the service side and is never serialized
/// back out of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Service-assigned address.
    #[serde(default)]
    pub href: String,
    /// Login name. The service defaults it to the email address.
    #[serde(default)]
    pub username: String,
    /// Email address, unique within the directory.
    pub email: String,
    /// Password, only sent on creation or update.
    #[serde(skip_serializing, default)]
    pub password: Option<SecretString>,
    /// Display name computed by the service.
    #[serde(default)]
    pub full_name: String,
    /// First name.
    #[serde(default)]
    pub given_name: String,
    /// Middle name.
    #[serde(default)]
    pub middle_name: String,
    /// Last name.
    #[serde(default)]
    pub surname: String,
    /// Enabled or disabled.
    #[serde(default)]
    pub status: ResourceStatus,
    /// Groups the account belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Link>,
    /// Membership records linking the account to its groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_memberships: Option<Link>,
    /// Directory the account lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<Link>,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Link>,
}

/// Membership of an account in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Service-assigned address.
    #[serde(default)]
    pub href: String,
    /// Member account.
    pub account: Link,
    /// Group the account belongs to.
    pub group: Link,
}

/// Arbitrary JSON attached to an account or group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    /// Service-assigned address.
    pub href: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
    /// Every other top-level key.
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}
