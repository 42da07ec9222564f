//! Static schema catalog.
//!
//! The catalog pairs every exported source entity type (an [`ExportSpec`])
//! with the target section that consumes it (a [`SectionSpec`]), and
//! declares the target tables ([`TableSpec`]) in foreign-key dependency
//! order. It replaces runtime model introspection: every field kind,
//! nullability rule, foreign key, backfill and repair is spelled out here
//! and checked once by [`Catalog::validate`].

use crate::error::{MigrateError, MigrateResult};
use dexmig_codec::{
    glyph, DecodeLayout, FieldKind, FieldMap, FieldSchema, Literal, RecordId, RecordLayout, Value,
    DISCARD_COLUMN, ID_FIELD,
};
use dexmig_codec::FieldKind::{Boolean, Float, Integer, Text, Timestamp};
use dexmig_codec::Literal::{Bool, Int, Null};
use std::collections::HashSet;

/// Source side of a section: what the writer reads and how it encodes it.
#[derive(Debug, Clone, Copy)]
pub struct ExportSpec {
    /// Section tag written in the file header line.
    pub tag: &'static str,
    /// Source table.
    pub source_table: &'static str,
    /// Human-readable name used in status lines.
    pub label: &'static str,
    /// Transferred fields besides `id`.
    pub fields: &'static [&'static str],
    /// Values that collapse to an empty token.
    pub defaults: &'static [(&'static str, Literal)],
}

impl ExportSpec {
    /// The encoded field order of this section.
    #[must_use]
    pub fn layout(&self) -> RecordLayout {
        RecordLayout::new(self.fields, self.defaults)
    }
}

/// Target side of a section: which table it feeds and how its positional
/// tokens map onto that table's fields.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    /// Section tag.
    pub tag: &'static str,
    /// Target table.
    pub table: &'static str,
    /// Target field per token position; [`DISCARD_COLUMN`] drops the token.
    pub columns: &'static [&'static str],
}

/// Structural check applied during instance validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Integer whose decimal form has between `min` and `max` digits.
    DigitCount {
        /// Fewest digits.
        min: usize,
        /// Most digits.
        max: usize,
    },
    /// Text of at most this many characters.
    MaxChars(usize),
}

impl FieldCheck {
    /// Checks a non-null value.
    ///
    /// # Errors
    ///
    /// Returns a description of the violation.
    pub fn check(self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::DigitCount { min, max }, Value::Integer(n)) => {
                let digits = n.unsigned_abs().to_string().len();
                if (min..=max).contains(&digits) {
                    Ok(())
                } else {
                    Err(format!("has {digits} digits, expected {min} to {max}"))
                }
            }
            (Self::DigitCount { .. }, other) => {
                Err(format!("is {}, expected a numeric id", other.type_name()))
            }
            (Self::MaxChars(limit), Value::Text(text)) => {
                let chars = text.chars().count();
                if chars <= limit {
                    Ok(())
                } else {
                    Err(format!("has {chars} characters, limit is {limit}"))
                }
            }
            (Self::MaxChars(_), _) => Ok(()),
        }
    }
}

/// Declaration of one target field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field name.
    pub name: &'static str,
    /// Declared kind.
    pub kind: FieldKind,
    /// Whether null is stored as-is.
    pub nullable: bool,
    /// Value used when the field is absent or its token is empty.
    pub default: Option<Literal>,
    /// Table this field references by primary key.
    pub references: Option<&'static str>,
    /// Value assigned when a non-nullable field is still null before commit.
    pub backfill: Option<Literal>,
    /// Structural check.
    pub check: Option<FieldCheck>,
    /// Value substituted once when the field fails validation.
    pub repair: Option<Literal>,
}

impl FieldSpec {
    /// A required field of `kind`.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            default: None,
            references: None,
            backfill: None,
            check: None,
            repair: None,
        }
    }

    /// Allows null.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the declared default.
    #[must_use]
    pub const fn defaults_to(mut self, value: Literal) -> Self {
        self.default = Some(value);
        self
    }

    /// Declares a foreign key to `table`.
    #[must_use]
    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }

    /// Sets the required-field backfill.
    #[must_use]
    pub const fn backfill(mut self, value: Literal) -> Self {
        self.backfill = Some(value);
        self
    }

    /// Sets the structural check.
    #[must_use]
    pub const fn check(mut self, check: FieldCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Sets the repair value.
    #[must_use]
    pub const fn repair(mut self, value: Literal) -> Self {
        self.repair = Some(value);
        self
    }
}

/// How to synthesize a stand-in row when a reference to this table dangles.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderPolicy {
    /// Secondary key that stores the sentinel.
    pub key_field: &'static str,
    /// Sentinel base; `sentinel = offset - missing_id`.
    pub offset: i64,
    /// Fields set on every placeholder.
    pub fixed: &'static [(&'static str, Literal)],
}

impl PlaceholderPolicy {
    /// Sentinel key for a missing id, or `None` on overflow.
    #[must_use]
    pub const fn sentinel(&self, missing: RecordId) -> Option<i64> {
        self.offset.checked_sub(missing)
    }

    /// Recovers the missing id from a sentinel key.
    #[must_use]
    pub const fn recover(&self, sentinel: i64) -> Option<RecordId> {
        self.offset.checked_sub(sentinel)
    }
}

/// Declaration of one target table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Table name.
    pub name: &'static str,
    /// Entity name used in status lines and audit logs.
    pub label: &'static str,
    /// Fields, `id` first.
    pub fields: &'static [FieldSpec],
    /// Placeholder synthesis for dangling references to this table.
    pub placeholder: Option<PlaceholderPolicy>,
}

impl TableSpec {
    /// Looks up a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that reference another table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&FieldSpec, &'static str)> {
        self.fields
            .iter()
            .filter_map(|f| f.references.map(|target| (f, target)))
    }
}

impl FieldSchema for TableSpec {
    fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.field(field).map(|f| f.kind)
    }

    fn template(&self) -> FieldMap {
        self.fields
            .iter()
            .map(|f| {
                let value = f.default.map_or(Value::Null, Literal::to_value);
                (f.name.to_string(), value)
            })
            .collect()
    }
}

/// The complete, validated mapping from source to target.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    /// Source sections in export order.
    pub exports: &'static [ExportSpec],
    /// Target sections.
    pub sections: &'static [SectionSpec],
    /// Target tables in dependency order, leaves first.
    pub tables: &'static [TableSpec],
}

impl Catalog {
    /// Looks up an export by tag.
    #[must_use]
    pub fn export(&self, tag: &str) -> Option<&'static ExportSpec> {
        self.exports.iter().find(|e| e.tag == tag)
    }

    /// Looks up a section by tag.
    #[must_use]
    pub fn section(&self, tag: &str) -> Option<&'static SectionSpec> {
        self.sections.iter().find(|s| s.tag == tag)
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&'static TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Position of a table in dependency order.
    #[must_use]
    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    /// Resolves the decode layout of a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section's table is unknown or a column does
    /// not exist in it.
    pub fn decode_layout(&self, section: &SectionSpec) -> MigrateResult<DecodeLayout> {
        let table = self.table(section.table).ok_or_else(|| {
            MigrateError::invalid_catalog(format!(
                "section {} targets unknown table {}",
                section.tag, section.table
            ))
        })?;
        Ok(DecodeLayout::resolve(section.columns, table)?)
    }

    /// Checks the catalog for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidCatalog`] describing the first problem.
    pub fn validate(&self) -> MigrateResult<()> {
        glyph::validate_contract()?;
        self.validate_tables()?;
        self.validate_sections()
    }

    fn validate_tables(&self) -> MigrateResult<()> {
        let mut names = HashSet::new();
        for (position, table) in self.tables.iter().enumerate() {
            if !names.insert(table.name) {
                return Err(MigrateError::invalid_catalog(format!(
                    "table {} declared twice",
                    table.name
                )));
            }
            match table.fields.first() {
                Some(f) if f.name == ID_FIELD && f.kind == FieldKind::Integer => {}
                _ => {
                    return Err(MigrateError::invalid_catalog(format!(
                        "table {} must start with an integer id",
                        table.name
                    )))
                }
            }

            for field in table.fields {
                for literal in [field.default, field.backfill, field.repair].into_iter().flatten() {
                    check_literal(table.name, field.name, literal)?;
                }
            }

            for (field, target) in table.foreign_keys() {
                match self.table_index(target) {
                    Some(i) if i < position => {}
                    Some(_) => {
                        return Err(MigrateError::invalid_catalog(format!(
                            "{}.{} references {target}, which is not ordered before it",
                            table.name, field.name
                        )))
                    }
                    None => {
                        return Err(MigrateError::invalid_catalog(format!(
                            "{}.{} references unknown table {target}",
                            table.name, field.name
                        )))
                    }
                }
            }

            if let Some(policy) = &table.placeholder {
                let required = std::iter::once(policy.key_field)
                    .chain(policy.fixed.iter().map(|(name, _)| *name));
                for name in required {
                    if table.field(name).is_none() {
                        return Err(MigrateError::invalid_catalog(format!(
                            "placeholder policy of {} names unknown field {name}",
                            table.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_sections(&self) -> MigrateResult<()> {
        let mut tags = HashSet::new();
        for export in self.exports {
            if !tags.insert(export.tag) {
                return Err(MigrateError::invalid_catalog(format!(
                    "export tag {} declared twice",
                    export.tag
                )));
            }
            if export.tag.is_empty() || glyph::find_reserved(export.tag).is_some() {
                return Err(MigrateError::invalid_catalog(format!(
                    "export tag '{}' is empty or contains a reserved glyph",
                    export.tag
                )));
            }
            for (field, literal) in export.defaults {
                check_literal(export.source_table, field, *literal)?;
            }

            let section = self.section(export.tag).ok_or_else(|| {
                MigrateError::invalid_catalog(format!("export {} has no target section", export.tag))
            })?;
            let width = export.layout().width();
            if section.columns.len() != width {
                return Err(MigrateError::invalid_catalog(format!(
                    "section {} has {} columns but its export writes {width}",
                    section.tag,
                    section.columns.len()
                )));
            }
            self.decode_layout(section).map_err(|e| {
                MigrateError::invalid_catalog(format!("section {}: {e}", section.tag))
            })?;
        }

        let mut seen = HashSet::new();
        for section in self.sections {
            if !seen.insert(section.tag) {
                return Err(MigrateError::invalid_catalog(format!(
                    "section tag {} declared twice",
                    section.tag
                )));
            }
            if self.export(section.tag).is_none() {
                return Err(MigrateError::invalid_catalog(format!(
                    "section {} has no export",
                    section.tag
                )));
            }
        }
        Ok(())
    }
}

fn check_literal(table: &str, field: &str, literal: Literal) -> MigrateResult<()> {
    if let Literal::Text(text) = literal {
        if let Some(glyph) = glyph::find_reserved(text) {
            return Err(MigrateError::invalid_catalog(format!(
                "{table}.{field} literal contains reserved glyph U+{:04X}",
                u32::from(glyph)
            )));
        }
    }
    Ok(())
}

/// Sentinel base for placeholder players.
pub const PLAYER_PLACEHOLDER_OFFSET: i64 = -10_000_000_000;

/// Substitute for a malformed custom emoji id.
pub const EMOJI_ID_REPAIR: i64 = 1_234_567_890_123_456_789;

const SNOWFLAKE: FieldCheck = FieldCheck::DigitCount { min: 17, max: 19 };

static EXPORTS: [ExportSpec; 13] = [
    ExportSpec {
        tag: "R",
        source_table: "cartype",
        label: "CarType",
        fields: &["name", "image"],
        defaults: &[],
    },
    ExportSpec {
        tag: "E",
        source_table: "country",
        label: "Country",
        fields: &["name", "image"],
        defaults: &[],
    },
    ExportSpec {
        tag: "S-EV",
        source_table: "event",
        label: "Event",
        fields: &["name", "rarity", "card"],
        defaults: &[
            ("catchPhrase", Null),
            ("startDate", Null),
            ("endDate", Null),
            ("emoji", Null),
            ("tradeable", Bool(true)),
            ("hidden", Bool(false)),
        ],
    },
    ExportSpec {
        tag: "S-EX",
        source_table: "exclusive",
        label: "Exclusive",
        fields: &["name", "image", "rarity"],
        defaults: &[("catchPhrase", Null), ("emoji", Null)],
    },
    ExportSpec {
        tag: "B",
        source_table: "car",
        label: "Car",
        fields: &[
            "cartype_id",
            "fullName",
            "weight",
            "horsepower",
            "rarity",
            "emoji",
            "collectionPicture",
            "carCredits",
            "capacityName",
            "capacityDescription",
            "createdAt",
        ],
        defaults: &[
            ("country_id", Null),
            ("shortName", Null),
            ("catchNames", Null),
            ("enabled", Bool(true)),
            ("tradeable", Bool(true)),
            ("spawnPicture", Null),
        ],
    },
    ExportSpec {
        tag: "P",
        source_table: "player",
        label: "Player",
        fields: &["discord_id"],
        defaults: &[("donationPolicy", Int(1)), ("privacyPolicy", Int(1))],
    },
    ExportSpec {
        tag: "BI",
        source_table: "carinstance",
        label: "CarInstance",
        fields: &["car_id", "player_id", "catchDate", "spawnedTime", "server"],
        defaults: &[
            ("trade_player_id", Null),
            ("exclusive_id", Null),
            ("event_id", Null),
            ("favorite", Bool(false)),
            ("tradeable", Bool(true)),
            ("weightBonus", Int(0)),
            ("horsepowerBonus", Int(0)),
        ],
    },
    ExportSpec {
        tag: "GC",
        source_table: "guildconfig",
        label: "GuildConfig",
        fields: &["guild_id"],
        defaults: &[("spawnChannel", Null), ("enabled", Bool(true))],
    },
    ExportSpec {
        tag: "F",
        source_table: "friendship",
        label: "Friendship",
        fields: &["friender_id", "friended_id", "since"],
        defaults: &[],
    },
    ExportSpec {
        tag: "BU",
        source_table: "blacklisteduser",
        label: "BlacklistedUser",
        fields: &["discord_id"],
        defaults: &[("reason", Null), ("date", Null)],
    },
    ExportSpec {
        tag: "BG",
        source_table: "blacklistedguild",
        label: "BlacklistedGuild",
        fields: &["discord_id"],
        defaults: &[("reason", Null), ("date", Null)],
    },
    ExportSpec {
        tag: "T",
        source_table: "trade",
        label: "Trade",
        fields: &["player1_id", "player2_id", "date"],
        defaults: &[],
    },
    ExportSpec {
        tag: "TO",
        source_table: "tradeobject",
        label: "TradeObject",
        fields: &["trade_id", "carinstance_id", "player_id"],
        defaults: &[],
    },
];

static SECTIONS: [SectionSpec; 13] = [
    SectionSpec {
        tag: "R",
        table: "regime",
        columns: &["id", "background", "name"],
    },
    SectionSpec {
        tag: "E",
        table: "economy",
        columns: &["id", "icon", "name"],
    },
    SectionSpec {
        tag: "S-EV",
        table: "special",
        columns: &[
            "id",
            "background",
            "catch_phrase",
            "emoji",
            "end_date",
            "hidden",
            "name",
            "rarity",
            "start_date",
            "tradeable",
        ],
    },
    SectionSpec {
        tag: "S-EX",
        table: "special",
        columns: &["id", "catch_phrase", "emoji", "background", "name", "rarity"],
    },
    SectionSpec {
        tag: "B",
        table: "ball",
        columns: &[
            "id",
            "capacity_description",
            "capacity_name",
            "credits",
            "regime_id",
            "catch_names",
            "collection_card",
            "economy_id",
            "created_at",
            "emoji_id",
            "enabled",
            "country",
            "attack",
            "rarity",
            "short_name",
            "wild_card",
            "tradeable",
            "health",
        ],
    },
    SectionSpec {
        tag: "P",
        table: "player",
        columns: &["id", "discord_id", "donation_policy", "privacy_policy"],
    },
    SectionSpec {
        tag: "BI",
        table: "ball_instance",
        columns: &[
            "id",
            "ball_id",
            "catch_date",
            "special_id",
            DISCARD_COLUMN,
            "favorite",
            "attack_bonus",
            "player_id",
            "server_id",
            "spawned_time",
            "trade_player_id",
            "tradeable",
            "health_bonus",
        ],
    },
    SectionSpec {
        tag: "GC",
        table: "guild_config",
        columns: &["id", "enabled", "guild_id", "spawn_channel"],
    },
    SectionSpec {
        tag: "F",
        table: "friendship",
        columns: &["id", "player1_id", "player2_id", "since"],
    },
    SectionSpec {
        tag: "BU",
        table: "blacklisted_id",
        columns: &["id", "date", "discord_id", "reason"],
    },
    SectionSpec {
        tag: "BG",
        table: "blacklisted_guild",
        columns: &["id", "date", "discord_id", "reason"],
    },
    SectionSpec {
        tag: "T",
        table: "trade",
        columns: &["id", "date", "player1_id", "player2_id"],
    },
    SectionSpec {
        tag: "TO",
        table: "trade_object",
        columns: &["id", "ballinstance_id", "player_id", "trade_id"],
    },
];

const ID: FieldSpec = FieldSpec::new(ID_FIELD, Integer);

static TABLES: [TableSpec; 12] = [
    TableSpec {
        name: "regime",
        label: "Regime",
        fields: &[
            ID,
            FieldSpec::new("name", Text).check(FieldCheck::MaxChars(64)),
            FieldSpec::new("background", Text).check(FieldCheck::MaxChars(200)),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "economy",
        label: "Economy",
        fields: &[
            ID,
            FieldSpec::new("name", Text).check(FieldCheck::MaxChars(64)),
            FieldSpec::new("icon", Text).check(FieldCheck::MaxChars(200)),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "special",
        label: "Special",
        fields: &[
            ID,
            FieldSpec::new("name", Text).check(FieldCheck::MaxChars(64)),
            FieldSpec::new("catch_phrase", Text)
                .nullable()
                .check(FieldCheck::MaxChars(128)),
            FieldSpec::new("start_date", Timestamp).nullable(),
            FieldSpec::new("end_date", Timestamp).nullable(),
            FieldSpec::new("rarity", Float),
            FieldSpec::new("emoji", Text)
                .nullable()
                .check(FieldCheck::MaxChars(20)),
            FieldSpec::new("background", Text)
                .nullable()
                .check(FieldCheck::MaxChars(200)),
            FieldSpec::new("tradeable", Boolean).defaults_to(Bool(true)),
            FieldSpec::new("hidden", Boolean).defaults_to(Bool(false)),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "ball",
        label: "Ball",
        fields: &[
            ID,
            FieldSpec::new("country", Text)
                .check(FieldCheck::MaxChars(48))
                .backfill(Literal::Text("Unknown")),
            FieldSpec::new("short_name", Text)
                .check(FieldCheck::MaxChars(12))
                .backfill(Literal::Text("Unknown")),
            FieldSpec::new("catch_names", Text).nullable(),
            FieldSpec::new("health", Integer),
            FieldSpec::new("attack", Integer),
            FieldSpec::new("rarity", Float),
            FieldSpec::new("enabled", Boolean)
                .defaults_to(Bool(true))
                .backfill(Bool(true)),
            FieldSpec::new("tradeable", Boolean)
                .defaults_to(Bool(true))
                .backfill(Bool(true)),
            FieldSpec::new("emoji_id", Integer)
                .check(SNOWFLAKE)
                .repair(Int(EMOJI_ID_REPAIR)),
            FieldSpec::new("economy_id", Integer)
                .nullable()
                .references("economy"),
            FieldSpec::new("regime_id", Integer).references("regime"),
            FieldSpec::new("wild_card", Text)
                .nullable()
                .check(FieldCheck::MaxChars(200)),
            FieldSpec::new("collection_card", Text).check(FieldCheck::MaxChars(200)),
            FieldSpec::new("credits", Text).check(FieldCheck::MaxChars(64)),
            FieldSpec::new("capacity_name", Text).check(FieldCheck::MaxChars(64)),
            FieldSpec::new("capacity_description", Text).check(FieldCheck::MaxChars(256)),
            FieldSpec::new("created_at", Timestamp).nullable(),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "player",
        label: "Player",
        fields: &[
            ID,
            FieldSpec::new("discord_id", Integer),
            FieldSpec::new("donation_policy", Integer).defaults_to(Int(1)),
            FieldSpec::new("privacy_policy", Integer).defaults_to(Int(1)),
        ],
        placeholder: Some(PlaceholderPolicy {
            key_field: "discord_id",
            offset: PLAYER_PLACEHOLDER_OFFSET,
            fixed: &[("donation_policy", Int(0)), ("privacy_policy", Int(0))],
        }),
    },
    TableSpec {
        name: "ball_instance",
        label: "BallInstance",
        fields: &[
            ID,
            FieldSpec::new("ball_id", Integer).references("ball"),
            FieldSpec::new("player_id", Integer).references("player"),
            FieldSpec::new("trade_player_id", Integer)
                .nullable()
                .references("player"),
            FieldSpec::new("special_id", Integer)
                .nullable()
                .references("special"),
            FieldSpec::new("catch_date", Timestamp),
            FieldSpec::new("spawned_time", Timestamp).nullable(),
            FieldSpec::new("server_id", Integer).nullable(),
            FieldSpec::new("favorite", Boolean).defaults_to(Bool(false)),
            FieldSpec::new("tradeable", Boolean).defaults_to(Bool(true)),
            FieldSpec::new("attack_bonus", Integer).defaults_to(Int(0)),
            FieldSpec::new("health_bonus", Integer).defaults_to(Int(0)),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "guild_config",
        label: "GuildConfig",
        fields: &[
            ID,
            FieldSpec::new("guild_id", Integer),
            FieldSpec::new("spawn_channel", Integer).nullable(),
            FieldSpec::new("enabled", Boolean).defaults_to(Bool(true)),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "friendship",
        label: "Friendship",
        fields: &[
            ID,
            FieldSpec::new("player1_id", Integer).references("player"),
            FieldSpec::new("player2_id", Integer).references("player"),
            FieldSpec::new("since", Timestamp),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "blacklisted_id",
        label: "BlacklistedID",
        fields: &[
            ID,
            FieldSpec::new("discord_id", Integer),
            FieldSpec::new("reason", Text).nullable(),
            FieldSpec::new("date", Timestamp).nullable(),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "blacklisted_guild",
        label: "BlacklistedGuild",
        fields: &[
            ID,
            FieldSpec::new("discord_id", Integer),
            FieldSpec::new("reason", Text).nullable(),
            FieldSpec::new("date", Timestamp).nullable(),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "trade",
        label: "Trade",
        fields: &[
            ID,
            FieldSpec::new("player1_id", Integer).references("player"),
            FieldSpec::new("player2_id", Integer).references("player"),
            FieldSpec::new("date", Timestamp),
        ],
        placeholder: None,
    },
    TableSpec {
        name: "trade_object",
        label: "TradeObject",
        fields: &[
            ID,
            FieldSpec::new("trade_id", Integer).references("trade"),
            FieldSpec::new("ballinstance_id", Integer).references("ball_instance"),
            FieldSpec::new("player_id", Integer).references("player"),
        ],
        placeholder: None,
    },
];

/// The CarFigures to BallsDex catalog.
pub static CATALOG: Catalog = Catalog {
    exports: &EXPORTS,
    sections: &SECTIONS,
    tables: &TABLES,
};
