//! Role-based allowlists for stateful precompiles.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{address::parse_address, diagnostics::Diagnostics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowlistRole {
    Admin,
    Manager,
    Enabled,
}

impl AllowlistRole {
    pub const ALL: [AllowlistRole; 3] = [Self::Admin, Self::Manager, Self::Enabled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Enabled => "enabled",
        }
    }
}

/// One address in an allowlist role.
///
/// `error` is derived from the address when the entry is built.
/// `required_reason` marks addresses that were added automatically (for
/// example the contract owner) and therefore do not count as user supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct AllowlistEntry {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Bare(String),
    Full {
        address: String,
        #[serde(default)]
        required_reason: Option<String>,
    },
}

impl From<RawEntry> for AllowlistEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Bare(address) => Self::new(address),
            RawEntry::Full {
                address,
                required_reason,
            } => {
                let mut entry = Self::new(address);
                entry.required_reason = required_reason;
                entry
            }
        }
    }
}

impl AllowlistEntry {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let error = parse_address(&address).err();
        Self {
            address,
            error,
            required_reason: None,
        }
    }

    pub fn required(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            required_reason: Some(reason.into()),
            ..Self::new(address)
        }
    }

    /// Parsed address, if the entry is well formed.
    pub fn parsed(&self) -> Option<Address> {
        parse_address(&self.address).ok()
    }

    fn counts_as_user_entry(&self) -> bool {
        self.error.is_none() && self.required_reason.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowlistAddresses {
    pub admin: Vec<AllowlistEntry>,
    pub manager: Vec<AllowlistEntry>,
    pub enabled: Vec<AllowlistEntry>,
}

impl AllowlistAddresses {
    pub fn role(&self, role: AllowlistRole) -> &[AllowlistEntry] {
        match role {
            AllowlistRole::Admin => &self.admin,
            AllowlistRole::Manager => &self.manager,
            AllowlistRole::Enabled => &self.enabled,
        }
    }

    pub fn role_mut(&mut self, role: AllowlistRole) -> &mut Vec<AllowlistEntry> {
        match role {
            AllowlistRole::Admin => &mut self.admin,
            AllowlistRole::Manager => &mut self.manager,
            AllowlistRole::Enabled => &mut self.enabled,
        }
    }

    /// Well-formed addresses of `role`, in entry order.
    pub fn addresses(&self, role: AllowlistRole) -> Vec<Address> {
        self.role(role)
            .iter()
            .filter_map(AllowlistEntry::parsed)
            .collect()
    }
}

/// Activation flag plus role addresses for one allowlist precompile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowlistPrecompileConfig {
    pub activated: bool,
    pub addresses: AllowlistAddresses,
}

impl AllowlistPrecompileConfig {
    pub fn activated(addresses: AllowlistAddresses) -> Self {
        Self {
            activated: true,
            addresses,
        }
    }

    /// Checks the allowlist, reporting under `key`.
    ///
    /// A deactivated allowlist is always valid. An activated one needs at
    /// least one user-supplied, well-formed address in any role, no entry in
    /// any role may carry an error, and an address may appear only once
    /// across all roles.
    pub fn validate(&self, key: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        if !self.activated {
            return diags;
        }

        let mut seen: BTreeMap<Address, (AllowlistRole, usize)> = BTreeMap::new();
        let mut has_user_entry = false;
        for role in AllowlistRole::ALL {
            for (i, entry) in self.addresses.role(role).iter().enumerate() {
                let entry_key = format!("{key}.{}[{i}]", role.as_str());
                if let Some(err) = &entry.error {
                    diags.error(entry_key, err.clone());
                    continue;
                }
                has_user_entry |= entry.counts_as_user_entry();

                let Some(address) = entry.parsed() else {
                    continue;
                };
                if let Some((first_role, first)) = seen.get(&address) {
                    diags.error(
                        entry_key,
                        format!("duplicate of {}[{first}]", first_role.as_str()),
                    );
                } else {
                    seen.insert(address, (role, i));
                }
            }
        }

        if !has_user_entry {
            diags.error(
                key,
                "activated allowlist needs at least one valid address in any role",
            );
        }

        diags
    }

    pub fn is_valid(&self) -> bool {
        !self.validate("").has_errors()
    }
}
