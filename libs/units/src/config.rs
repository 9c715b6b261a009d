/// What a registry does when a name is already bound to a different object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AliasPolicy {
    /// Fail the whole registration with [`crate::Error::DuplicateAlias`].
    #[default]
    Reject,
    /// Log the collision and keep the existing binding.
    KeepExisting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct RegistryOptions {
    pub alias_policy: AliasPolicy,
    /// Catalogs loaded by [`crate::catalog::build`].
    #[cfg(feature = "catalog")]
    pub catalogs: Vec<crate::catalog::Catalog>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            alias_policy: AliasPolicy::default(),
            #[cfg(feature = "catalog")]
            catalogs: crate::catalog::Catalog::ALL.to_vec(),
        }
    }
}

impl RegistryOptions {
    pub fn with_alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.alias_policy = policy;
        self
    }

    #[cfg(feature = "catalog")]
    pub fn with_catalogs(mut self, catalogs: impl IntoIterator<Item = crate::catalog::Catalog>) -> Self {
        self.catalogs = catalogs.into_iter().collect();
        self
    }
}
