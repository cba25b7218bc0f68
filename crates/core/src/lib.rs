use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

pub const HOSTS_ENV: &str = "WAZUH_HOSTS";
pub const DEFAULT_HOSTS: [&str; 3] = ["server1", "indexer1", "dashboard1"];
pub const REQUIRED_HOSTS: usize = Group::ALL.len();

/// Per-host variables as returned to `--host` queries.
pub type HostVars = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("expected at least {required} hosts, found {found}")]
    InsufficientHosts { found: usize, required: usize },
    #[error("failed to serialize inventory: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Server,
    Indexer,
    Dashboard,
}

impl Group {
    /// Groups in output order; a group's index is the host position it takes.
    pub const ALL: [Group; 3] = [Group::Server, Group::Indexer, Group::Dashboard];

    pub fn name(&self) -> &'static str {
        match self {
            Group::Server => "wazuh_server",
            Group::Indexer => "wazuh_indexer",
            Group::Dashboard => "wazuh_dashboard",
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Group::Server => 0,
            Group::Indexer => 1,
            Group::Dashboard => 2,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostList(Vec<String>);

impl HostList {
    /// Splits on commas. Entries are kept verbatim, including empty ones.
    pub fn parse(value: &str) -> Self {
        Self(value.split(',').map(str::to_string).collect())
    }

    pub fn fallback() -> Self {
        Self(DEFAULT_HOSTS.iter().map(|host| host.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostGroup {
    pub hosts: Vec<String>,
}

impl HostGroup {
    fn single(host: &str) -> Self {
        Self {
            hosts: vec![host.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    groups: [HostGroup; 3],
}

impl Inventory {
    pub fn from_hosts(hosts: &HostList) -> Result<Self, InventoryError> {
        if hosts.len() < REQUIRED_HOSTS {
            return Err(InventoryError::InsufficientHosts {
                found: hosts.len(),
                required: REQUIRED_HOSTS,
            });
        }
        if hosts.len() > REQUIRED_HOSTS {
            debug!(
                ignored = hosts.len() - REQUIRED_HOSTS,
                "extra hosts beyond the dashboard position are ignored"
            );
        }

        // empty entries are assigned as-is
        Ok(Self {
            groups: Group::ALL
                .map(|group| HostGroup::single(hosts.get(group.position()).unwrap_or_default())),
        })
    }

    pub fn group(&self, group: Group) -> &HostGroup {
        &self.groups[group.position()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Group, &HostGroup)> {
        Group::ALL.into_iter().map(move |group| (group, self.group(group)))
    }

    pub fn contains_host(&self, host: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.hosts.iter().any(|name| name == host))
    }

    /// The inventory carries no per-host variables, so this is always empty.
    pub fn host_vars(&self, host: &str) -> HostVars {
        debug!(host, known = self.contains_host(host), "host vars requested");
        HostVars::new()
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, hosts) in self.iter() {
            map.serialize_entry(group.name(), hosts)?;
        }
        map.end()
    }
}

/// An unset or empty source falls back to the built-in hosts.
pub fn resolve_hosts(source: Option<&str>) -> HostList {
    match source {
        Some(value) if !value.is_empty() => HostList::parse(value),
        _ => {
            debug!("{HOSTS_ENV} not set, using default hosts");
            HostList::fallback()
        }
    }
}

pub fn build_inventory(source: Option<&str>) -> Result<Inventory, InventoryError> {
    let hosts = resolve_hosts(source);
    Inventory::from_hosts(&hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts_of(inventory: &Inventory) -> Vec<&str> {
        inventory
            .iter()
            .map(|(_, group)| group.hosts[0].as_str())
            .collect()
    }

    #[test]
    fn unset_source_uses_defaults() {
        let inventory = build_inventory(None).unwrap();
        assert_eq!(hosts_of(&inventory), vec!["server1", "indexer1", "dashboard1"]);
    }

    #[test]
    fn empty_source_uses_defaults() {
        let inventory = build_inventory(Some("")).unwrap();
        assert_eq!(hosts_of(&inventory), DEFAULT_HOSTS.to_vec());
    }

    #[test]
    fn assigns_hosts_positionally() {
        let inventory = build_inventory(Some("a,b,c")).unwrap();
        assert_eq!(inventory.group(Group::Server).hosts, vec!["a"]);
        assert_eq!(inventory.group(Group::Indexer).hosts, vec!["b"]);
        assert_eq!(inventory.group(Group::Dashboard).hosts, vec!["c"]);
    }

    #[test]
    fn ignores_extra_hosts() {
        let inventory = build_inventory(Some("a,b,c,d,e")).unwrap();
        assert_eq!(hosts_of(&inventory), vec!["a", "b", "c"]);
        assert!(!inventory.contains_host("d"));
    }

    #[test]
    fn keeps_entries_verbatim() {
        let inventory = build_inventory(Some("a, b ,c")).unwrap();
        assert_eq!(hosts_of(&inventory), vec!["a", " b ", "c"]);
    }

    #[test]
    fn single_host_is_insufficient() {
        assert!(matches!(
            build_inventory(Some("onlyone")),
            Err(InventoryError::InsufficientHosts {
                found: 1,
                required: 3
            })
        ));
    }

    #[test]
    fn two_hosts_are_insufficient() {
        assert!(matches!(
            build_inventory(Some("a,b")),
            Err(InventoryError::InsufficientHosts { found: 2, .. })
        ));
    }

    #[test]
    fn empty_assigned_host_is_kept() {
        let inventory = build_inventory(Some("a,,c")).unwrap();
        assert_eq!(hosts_of(&inventory), vec!["a", "", "c"]);
        assert_eq!(inventory.group(Group::Indexer).hosts, vec![""]);
    }

    #[test]
    fn three_empty_entries_are_three_hosts() {
        let inventory = build_inventory(Some(",,")).unwrap();
        assert_eq!(hosts_of(&inventory), vec!["", "", ""]);
    }

    #[test]
    fn empty_extra_host_is_ignored() {
        assert!(build_inventory(Some("a,b,c,")).is_ok());
    }

    #[test]
    fn error_message_names_counts() {
        let err = build_inventory(Some("x")).unwrap_err();
        assert_eq!(err.to_string(), "expected at least 3 hosts, found 1");
    }

    #[test]
    fn serializes_groups_in_fixed_order() {
        let inventory = build_inventory(Some("a,b,c")).unwrap();
        let json = serde_json::to_string(&inventory).unwrap();
        assert_eq!(
            json,
            r#"{"wazuh_server":{"hosts":["a"]},"wazuh_indexer":{"hosts":["b"]},"wazuh_dashboard":{"hosts":["c"]}}"#
        );
    }

    #[test]
    fn host_vars_are_empty() {
        let inventory = build_inventory(None).unwrap();
        assert!(inventory.host_vars("server1").is_empty());
        assert!(inventory.host_vars("unknown").is_empty());
    }

    #[test]
    fn group_positions_match_order() {
        for (index, group) in Group::ALL.iter().enumerate() {
            assert_eq!(group.position(), index);
        }
    }
}
