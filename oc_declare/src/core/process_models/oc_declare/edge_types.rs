//! The editor draws constraints as edges of nine visual kinds. Each kind corresponds to an
//! [`OCDeclareArcType`] plus a default cardinality; the negated kinds always use `(0, 0)`.
//!
//! Both directions of the mapping are derived from [`EDGE_TYPE_TABLE`].
use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    Cardinality, OCDeclareArc, OCDeclareArcLabel, OCDeclareArcType, OCDeclareNode,
    DEFAULT_CARDINALITY, NEGATED_CARDINALITY,
};

/// Visual edge kind used by the editor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum EdgeType {
    /// Eventually-follows
    #[serde(rename = "ef")]
    Ef,
    /// Eventually-follows, reversed (eventually-precedes)
    #[serde(rename = "ef-rev")]
    EfRev,
    /// Negated eventually-follows
    #[serde(rename = "nef")]
    Nef,
    /// Negated eventually-precedes
    #[serde(rename = "nef-rev")]
    NefRev,
    /// Directly-follows
    #[serde(rename = "df")]
    Df,
    /// Directly-follows, reversed (directly-precedes)
    #[serde(rename = "df-rev")]
    DfRev,
    /// Negated directly-follows
    #[serde(rename = "ndf")]
    Ndf,
    /// Negated directly-precedes
    #[serde(rename = "ndf-rev")]
    NdfRev,
    /// Association
    #[serde(rename = "ass")]
    Ass,
}

/// One row of the edge type table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTypeInfo {
    /// Visual edge kind
    pub edge_type: EdgeType,
    /// String form
    pub name: &'static str,
    /// Arc type used for evaluation
    pub arc_type: OCDeclareArcType,
    /// Whether the kind denotes a forbidden relationship
    pub negated: bool,
}

const fn row(
    edge_type: EdgeType,
    name: &'static str,
    arc_type: OCDeclareArcType,
    negated: bool,
) -> EdgeTypeInfo {
    EdgeTypeInfo {
        edge_type,
        name,
        arc_type,
        negated,
    }
}

/// The edge type table, in declaration order of [`EdgeType`]
pub const EDGE_TYPE_TABLE: [EdgeTypeInfo; 9] = [
    row(EdgeType::Ef, "ef", OCDeclareArcType::EF, false),
    row(EdgeType::EfRev, "ef-rev", OCDeclareArcType::EP, false),
    row(EdgeType::Nef, "nef", OCDeclareArcType::EF, true),
    row(EdgeType::NefRev, "nef-rev", OCDeclareArcType::EP, true),
    row(EdgeType::Df, "df", OCDeclareArcType::DF, false),
    row(EdgeType::DfRev, "df-rev", OCDeclareArcType::DP, false),
    row(EdgeType::Ndf, "ndf", OCDeclareArcType::DF, true),
    row(EdgeType::NdfRev, "ndf-rev", OCDeclareArcType::DP, true),
    row(EdgeType::Ass, "ass", OCDeclareArcType::AS, false),
];

/// Every visual edge kind
pub const ALL_EDGE_TYPES: [EdgeType; 9] = [
    EdgeType::Ef,
    EdgeType::EfRev,
    EdgeType::Nef,
    EdgeType::NefRev,
    EdgeType::Df,
    EdgeType::DfRev,
    EdgeType::Ndf,
    EdgeType::NdfRev,
    EdgeType::Ass,
];

impl EdgeType {
    /// Table row of this edge type
    pub fn info(self) -> &'static EdgeTypeInfo {
        &EDGE_TYPE_TABLE[self as usize]
    }

    /// String form (e.g., `"nef-rev"`)
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Whether this kind denotes a forbidden relationship
    pub fn is_negated(self) -> bool {
        self.info().negated
    }

    /// Arc type and cardinality of this edge kind
    ///
    /// Negated kinds always yield `(0, 0)`; other kinds use `cardinality` or default to `(1, ∞)`.
    pub fn to_arc_type(self, cardinality: Option<Cardinality>) -> (OCDeclareArcType, Cardinality) {
        let info = self.info();
        let counts = if info.negated {
            NEGATED_CARDINALITY
        } else {
            cardinality.unwrap_or(DEFAULT_CARDINALITY)
        };
        (info.arc_type, counts)
    }

    /// Build the arc for an edge of this kind
    pub fn to_arc(
        self,
        from: OCDeclareNode,
        to: OCDeclareNode,
        label: OCDeclareArcLabel,
        cardinality: Option<Cardinality>,
    ) -> OCDeclareArc {
        let (arc_type, counts) = self.to_arc_type(cardinality);
        OCDeclareArc {
            from,
            to,
            arc_type,
            label,
            counts,
            negated: self.is_negated(),
        }
    }

    fn lookup(arc_type: OCDeclareArcType, negated: bool) -> Option<Self> {
        EDGE_TYPE_TABLE
            .iter()
            .find(|r| r.arc_type == arc_type && r.negated == negated)
            .map(|r| r.edge_type)
    }

    /// The non-negated edge kind of an arc type
    pub fn from_arc_type(arc_type: OCDeclareArcType) -> Self {
        // Every arc type has a non-negated row
        Self::lookup(arc_type, false).unwrap_or(EdgeType::Ass)
    }

    /// Edge kind of an arc, taking the explicit negation flag into account
    ///
    /// A negated association has no visual form and maps to [`EdgeType::Ass`].
    pub fn from_arc(arc: &OCDeclareArc) -> Self {
        Self::lookup(arc.arc_type, arc.negated).unwrap_or_else(|| Self::from_arc_type(arc.arc_type))
    }
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown edge type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown edge type `{0}`")]
pub struct UnknownEdgeType(pub String);

impl FromStr for EdgeType {
    type Err = UnknownEdgeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EDGE_TYPE_TABLE
            .iter()
            .find(|r| r.name == s)
            .map(|r| r.edge_type)
            .ok_or_else(|| UnknownEdgeType(s.to_string()))
    }
}
