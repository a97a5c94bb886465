//! Declared field layout of the firewall resource.
//!
//! The host tool owns schema validation and diffing; this module describes the
//! fields it should expect and supplies the one custom diff predicate, for
//! `port_range`.

/// Diff suppression predicate: `(old, new) -> suppress`.
pub type DiffSuppressFn = fn(&str, &str) -> bool;

/// Port ranges that compare equal for diffing.
///
/// The API reports "every port" as `"0"` while configurations may say
/// `"all"`; that pairing, and identical values, produce no diff.
#[must_use]
pub fn suppress_port_range_diff(old: &str, new: &str) -> bool {
    (old == "0" && new == "all") || old == new
}

/// Direction of a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Traffic to the targets; parties are sources.
    Inbound,
    /// Traffic from the targets; parties are destinations.
    Outbound,
}

impl Direction {
    /// Both directions.
    pub const ALL: [Self; 2] = [Self::Inbound, Self::Outbound];

    /// Name of the repeated rule block.
    #[must_use]
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Inbound => "inbound_rule",
            Self::Outbound => "outbound_rule",
        }
    }

    /// Prefix of the party fields inside a rule block.
    #[must_use]
    pub const fn party_prefix(self) -> &'static str {
        match self {
            Self::Inbound => "source",
            Self::Outbound => "destination",
        }
    }
}

/// Value type of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Scalar string.
    String,
    /// Scalar integer.
    Int,
    /// Scalar boolean.
    Bool,
    /// Ordered list of strings.
    StringList,
    /// Ordered list of integers.
    IntList,
    /// Repeated nested block.
    BlockList(Vec<FieldSchema>),
}

/// Who supplies a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be declared.
    Required,
    /// May be declared.
    Optional,
    /// Set from the remote resource only.
    Computed,
}

/// One field of the resource schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Value type.
    pub kind: FieldKind,
    /// Who supplies it.
    pub presence: Presence,
    /// Custom diff suppression, if any.
    pub diff_suppress: Option<DiffSuppressFn>,
}

impl FieldSchema {
    fn new(name: impl Into<String>, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name: name.into(),
            kind,
            presence,
            diff_suppress: None,
        }
    }

    fn with_diff_suppress(mut self, suppress: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(suppress);
        self
    }

    /// Whether a change from `old` to `new` should be ignored.
    #[must_use]
    pub fn suppresses(&self, old: &str, new: &str) -> bool {
        self.diff_suppress.map_or(old == new, |suppress| suppress(old, new))
    }
}

/// Fields of one rule block.
#[must_use]
pub fn rule_schema(direction: Direction) -> Vec<FieldSchema> {
    let prefix = direction.party_prefix();
    vec![
        FieldSchema::new("protocol", FieldKind::String, Presence::Optional),
        FieldSchema::new("port_range", FieldKind::String, Presence::Optional)
            .with_diff_suppress(suppress_port_range_diff),
        FieldSchema::new(format!("{prefix}_addresses"), FieldKind::StringList, Presence::Optional),
        FieldSchema::new(format!("{prefix}_tags"), FieldKind::StringList, Presence::Optional),
        FieldSchema::new(format!("{prefix}_instance_ids"), FieldKind::IntList, Presence::Optional),
        FieldSchema::new(
            format!("{prefix}_load_balancer_uids"),
            FieldKind::StringList,
            Presence::Optional,
        ),
    ]
}

/// Fields of the firewall resource.
#[must_use]
pub fn firewall_schema() -> Vec<FieldSchema> {
    let pending_change = vec![
        FieldSchema::new("instance_id", FieldKind::Int, Presence::Computed),
        FieldSchema::new("removing", FieldKind::Bool, Presence::Computed),
        FieldSchema::new("status", FieldKind::String, Presence::Computed),
    ];

    let mut fields = vec![
        FieldSchema::new("name", FieldKind::String, Presence::Required),
        FieldSchema::new("instance_ids", FieldKind::StringList, Presence::Optional),
        FieldSchema::new("tags", FieldKind::StringList, Presence::Optional),
    ];
    fields.extend(Direction::ALL.into_iter().map(|direction| {
        FieldSchema::new(
            direction.block_name(),
            FieldKind::BlockList(rule_schema(direction)),
            Presence::Optional,
        )
    }));
    fields.extend([
        FieldSchema::new("status", FieldKind::String, Presence::Computed),
        FieldSchema::new("created_at", FieldKind::String, Presence::Computed),
        FieldSchema::new(
            "pending_changes",
            FieldKind::BlockList(pending_change),
            Presence::Computed,
        ),
    ]);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", "all", true)]
    #[case("80", "80", true)]
    #[case("all", "all", true)]
    #[case("80", "443", false)]
    #[case("all", "0", false)]
    #[case("0", "", false)]
    fn port_range_suppression(#[case] old: &str, #[case] new: &str, #[case] expected: bool) {
        assert_eq!(suppress_port_range_diff(old, new), expected);
    }

    fn field<'a>(fields: &'a [FieldSchema], name: &str) -> &'a FieldSchema {
        fields
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn top_level_presence() {
        let fields = firewall_schema();
        assert_eq!(field(&fields, "name").presence, Presence::Required);
        assert_eq!(field(&fields, "tags").presence, Presence::Optional);
        assert_eq!(field(&fields, "status").presence, Presence::Computed);
        assert_eq!(field(&fields, "created_at").presence, Presence::Computed);
        assert_eq!(field(&fields, "pending_changes").presence, Presence::Computed);
    }

    #[rstest]
    #[case(Direction::Inbound, "inbound_rule", "source_addresses")]
    #[case(Direction::Outbound, "outbound_rule", "destination_load_balancer_uids")]
    fn rule_blocks_use_direction_prefix(
        #[case] direction: Direction,
        #[case] block: &str,
        #[case] party_field: &str,
    ) {
        let fields = firewall_schema();
        let FieldKind::BlockList(rule_fields) = &field(&fields, block).kind else {
            panic!("{block} is not a block list");
        };
        assert_eq!(rule_fields.len(), 6);
        assert!(rule_fields.iter().any(|f| f.name == party_field));
        assert_eq!(direction.block_name(), block);
    }

    #[test]
    fn port_range_field_carries_suppression() {
        let rules = rule_schema(Direction::Inbound);
        let port_range = field(&rules, "port_range");
        assert!(port_range.suppresses("0", "all"));
        assert!(!port_range.suppresses("22", "2222"));

        let protocol = field(&rules, "protocol");
        assert!(protocol.suppresses("tcp", "tcp"));
        assert!(!protocol.suppresses("0", "all"));
    }
}
