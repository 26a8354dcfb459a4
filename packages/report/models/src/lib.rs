#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report categories, sub-categories and record types for the Vitibrasil
//! statistics API.
//!
//! The portal publishes five report tabs (production, processing,
//! commercialization, import and export). Three of them are split further
//! into sub-tabs. This crate defines the closed taxonomy of those tabs, the
//! validated [`ReportRequest`] that addresses one report page, and the typed
//! records extracted from each page. Record fields serialize with the
//! portal's Portuguese names so API responses and fallback snapshots share
//! one JSON shape.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Earliest year published by the portal.
pub const MIN_YEAR: u16 = 1970;

/// Latest year available for production, processing and commercialization.
pub const MAX_YEAR: u16 = 2023;

/// Latest year available for import and export.
pub const MAX_TRADE_YEAR: u16 = 2024;

/// Top-level report tabs of the portal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ReportCategory {
    /// Wine, juice and derivatives production (liters)
    #[serde(rename = "producao")]
    #[strum(serialize = "producao")]
    Production,
    /// Grapes processed, by cultivar (kg)
    #[serde(rename = "processamento")]
    #[strum(serialize = "processamento")]
    Processing,
    /// Domestic sales of wine and derivatives (liters)
    #[serde(rename = "comercializacao")]
    #[strum(serialize = "comercializacao")]
    Commercialization,
    /// Imports by country of origin
    #[serde(rename = "importacao")]
    #[strum(serialize = "importacao")]
    Import,
    /// Exports by destination country
    #[serde(rename = "exportacao")]
    #[strum(serialize = "exportacao")]
    Export,
}

impl ReportCategory {
    /// Returns the numeric `opcao` code the portal uses for this tab.
    #[must_use]
    pub const fn option_code(self) -> u8 {
        match self {
            Self::Production => 2,
            Self::Processing => 3,
            Self::Commercialization => 4,
            Self::Import => 5,
            Self::Export => 6,
        }
    }

    /// Returns the inclusive range of years the portal publishes for this
    /// tab.
    #[must_use]
    pub const fn year_range(self) -> RangeInclusive<u16> {
        match self {
            Self::Production | Self::Processing | Self::Commercialization => {
                MIN_YEAR..=MAX_YEAR
            }
            Self::Import | Self::Export => MIN_YEAR..=MAX_TRADE_YEAR,
        }
    }

    /// Whether this tab is split into sub-tabs.
    #[must_use]
    pub const fn has_sub_categories(self) -> bool {
        matches!(self, Self::Processing | Self::Import | Self::Export)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Production,
            Self::Processing,
            Self::Commercialization,
            Self::Import,
            Self::Export,
        ]
    }
}

/// Sub-tabs of [`ReportCategory::Processing`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessingGrape {
    /// Vitis vinifera cultivars
    Viniferas,
    /// American and hybrid cultivars
    AmericanasHibridas,
    /// Table grapes
    UvasDeMesa,
    /// Processing without cultivar classification
    SemClassificacao,
}

impl ProcessingGrape {
    /// Returns the portal's `subopcao` code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Viniferas => 1,
            Self::AmericanasHibridas => 2,
            Self::UvasDeMesa => 3,
            Self::SemClassificacao => 4,
        }
    }
}

/// Sub-tabs of [`ReportCategory::Import`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImportProduct {
    /// Table wines
    VinhosDeMesa,
    /// Sparkling wines
    Espumantes,
    /// Fresh grapes
    UvasFrescas,
    /// Raisins
    UvasPassas,
    /// Grape juice
    SucoDeUva,
}

impl ImportProduct {
    /// Returns the portal's `subopcao` code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::VinhosDeMesa => 1,
            Self::Espumantes => 2,
            Self::UvasFrescas => 3,
            Self::UvasPassas => 4,
            Self::SucoDeUva => 5,
        }
    }
}

/// Sub-tabs of [`ReportCategory::Export`].
///
/// Same products as [`ImportProduct`] minus raisins, so the codes differ.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExportProduct {
    /// Table wines
    VinhosDeMesa,
    /// Sparkling wines
    Espumantes,
    /// Fresh grapes
    UvasFrescas,
    /// Grape juice
    SucoDeUva,
}

impl ExportProduct {
    /// Returns the portal's `subopcao` code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::VinhosDeMesa => 1,
            Self::Espumantes => 2,
            Self::UvasFrescas => 3,
            Self::SucoDeUva => 4,
        }
    }
}

/// A sub-tab, tied to the category that owns it.
///
/// Construct through [`SubCategory::parse`] so a slug can only ever be
/// resolved within its owning category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SubCategory {
    /// Processing sub-tab
    Processing(ProcessingGrape),
    /// Import sub-tab
    Import(ImportProduct),
    /// Export sub-tab
    Export(ExportProduct),
}

impl SubCategory {
    /// Resolves a sub-tab slug within `category`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidSubCategory`] if `category` has no
    /// sub-tabs or `slug` is not one of them.
    pub fn parse(category: ReportCategory, slug: &str) -> Result<Self, RequestError> {
        let parsed = match category {
            ReportCategory::Processing => slug.parse().ok().map(Self::Processing),
            ReportCategory::Import => slug.parse().ok().map(Self::Import),
            ReportCategory::Export => slug.parse().ok().map(Self::Export),
            ReportCategory::Production | ReportCategory::Commercialization => None,
        };

        parsed.ok_or_else(|| RequestError::InvalidSubCategory {
            category,
            sub_category: slug.to_string(),
        })
    }

    /// Returns the category this sub-tab belongs to.
    #[must_use]
    pub const fn category(self) -> ReportCategory {
        match self {
            Self::Processing(_) => ReportCategory::Processing,
            Self::Import(_) => ReportCategory::Import,
            Self::Export(_) => ReportCategory::Export,
        }
    }

    /// Returns the portal's `subopcao` code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Processing(grape) => grape.code(),
            Self::Import(product) => product.code(),
            Self::Export(product) => product.code(),
        }
    }

    /// Returns the URL slug (`sub_aba`) of this sub-tab.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Processing(grape) => grape.into(),
            Self::Import(product) => product.into(),
            Self::Export(product) => product.into(),
        }
    }

    /// Returns all sub-tabs of the given category, in portal order.
    #[must_use]
    pub fn for_category(category: ReportCategory) -> Vec<Self> {
        match category {
            ReportCategory::Processing => [
                ProcessingGrape::Viniferas,
                ProcessingGrape::AmericanasHibridas,
                ProcessingGrape::UvasDeMesa,
                ProcessingGrape::SemClassificacao,
            ]
            .into_iter()
            .map(Self::Processing)
            .collect(),
            ReportCategory::Import => [
                ImportProduct::VinhosDeMesa,
                ImportProduct::Espumantes,
                ImportProduct::UvasFrescas,
                ImportProduct::UvasPassas,
                ImportProduct::SucoDeUva,
            ]
            .into_iter()
            .map(Self::Import)
            .collect(),
            ReportCategory::Export => [
                ExportProduct::VinhosDeMesa,
                ExportProduct::Espumantes,
                ExportProduct::UvasFrescas,
                ExportProduct::SucoDeUva,
            ]
            .into_iter()
            .map(Self::Export)
            .collect(),
            ReportCategory::Production | ReportCategory::Commercialization => Vec::new(),
        }
    }
}

impl std::fmt::Display for SubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Errors raised while validating a report request, before anything is
/// fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The category slug is not one of the portal tabs.
    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    /// The sub-tab does not exist within the category.
    #[error("invalid sub-category '{sub_category}' for category '{category}'")]
    InvalidSubCategory {
        /// Category the sub-tab was looked up in.
        category: ReportCategory,
        /// The rejected slug.
        sub_category: String,
    },

    /// The year is not numeric or lies outside the published range.
    #[error("invalid year '{year}' for category '{category}': expected {min}-{max}")]
    InvalidYear {
        /// Category whose range was checked.
        category: ReportCategory,
        /// The rejected year, as supplied.
        year: String,
        /// First published year.
        min: u16,
        /// Last published year.
        max: u16,
    },
}

/// A validated address of one report page: tab, optional sub-tab and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportRequest {
    category: ReportCategory,
    sub_category: Option<SubCategory>,
    year: u16,
}

impl ReportRequest {
    /// Builds a request, checking sub-tab ownership and the year range.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidSubCategory`] if `sub_category`
    /// belongs to another category, or [`RequestError::InvalidYear`] if
    /// `year` is outside [`ReportCategory::year_range`].
    pub fn new(
        category: ReportCategory,
        sub_category: Option<SubCategory>,
        year: u16,
    ) -> Result<Self, RequestError> {
        if let Some(sub) = sub_category
            && sub.category() != category
        {
            return Err(RequestError::InvalidSubCategory {
                category,
                sub_category: sub.slug().to_string(),
            });
        }

        let range = category.year_range();
        if !range.contains(&year) {
            return Err(RequestError::InvalidYear {
                category,
                year: year.to_string(),
                min: *range.start(),
                max: *range.end(),
            });
        }

        Ok(Self {
            category,
            sub_category,
            year,
        })
    }

    /// Builds a request from raw path segments (`sub_aba`, `ano`).
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the sub-tab slug is unknown for the
    /// category or the year is not a number within range.
    pub fn from_path(
        category: ReportCategory,
        sub_category: Option<&str>,
        year: &str,
    ) -> Result<Self, RequestError> {
        let sub_category = sub_category
            .map(|slug| SubCategory::parse(category, slug))
            .transpose()?;

        let range = category.year_range();
        let year: u16 = year.trim().parse().map_err(|_| RequestError::InvalidYear {
            category,
            year: year.to_string(),
            min: *range.start(),
            max: *range.end(),
        })?;

        Self::new(category, sub_category, year)
    }

    /// The report tab.
    #[must_use]
    pub const fn category(&self) -> ReportCategory {
        self.category
    }

    /// The sub-tab, if any.
    #[must_use]
    pub const fn sub_category(&self) -> Option<SubCategory> {
        self.sub_category
    }

    /// The report year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the key path of this report in a fallback snapshot:
    /// `[category, sub_aba?, ano]`.
    #[must_use]
    pub fn key_path(&self) -> Vec<String> {
        let mut path = vec![self.category.to_string()];
        if let Some(sub) = self.sub_category {
            path.push(sub.slug().to_string());
        }
        path.push(self.year.to_string());
        path
    }
}

impl std::fmt::Display for ReportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key_path().join("/"))
    }
}

/// One line item of the production report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// Product group (e.g. `"Vinho De Mesa"`), title-cased.
    #[serde(rename = "tipo_produto")]
    pub product_type: String,
    /// Product within the group (e.g. `"Tinto"`).
    #[serde(rename = "produto")]
    pub product: String,
    /// Volume produced, in liters.
    #[serde(rename = "quantidade_litros")]
    pub quantity_liters: i64,
}

/// One cultivar line of the processing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// Grape group (e.g. `"TINTAS"`), as published.
    #[serde(rename = "tipo_uva")]
    pub grape_type: String,
    /// Cultivar name.
    #[serde(rename = "cultivo")]
    pub cultivar: String,
    /// Mass processed, in kilograms.
    #[serde(rename = "quantidade_kg")]
    pub quantity_kg: i64,
}

/// One line item of the commercialization report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercializationRecord {
    /// Product group, title-cased.
    #[serde(rename = "tipo_produto")]
    pub product_type: String,
    /// Product within the group, lower-cased.
    #[serde(rename = "produto")]
    pub product: String,
    /// Volume sold, in liters.
    #[serde(rename = "quantidade_litros")]
    pub quantity_liters: i64,
}

/// One country line of the import or export report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Partner country.
    #[serde(rename = "pais")]
    pub country: String,
    /// Traded mass, in kilograms.
    #[serde(rename = "quantidade_kg")]
    pub quantity_kg: i64,
    /// Traded value, in US dollars.
    #[serde(rename = "valor_dolar")]
    pub value_usd: i64,
}

/// The records of one report page, shaped by its category.
///
/// Serializes as the bare record array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// Production records
    Production(Vec<ProductionRecord>),
    /// Processing records
    Processing(Vec<ProcessingRecord>),
    /// Commercialization records
    Commercialization(Vec<CommercializationRecord>),
    /// Import records
    Import(Vec<TradeRecord>),
    /// Export records
    Export(Vec<TradeRecord>),
}

impl Report {
    /// Returns an empty report of the given category.
    #[must_use]
    pub const fn empty(category: ReportCategory) -> Self {
        match category {
            ReportCategory::Production => Self::Production(Vec::new()),
            ReportCategory::Processing => Self::Processing(Vec::new()),
            ReportCategory::Commercialization => Self::Commercialization(Vec::new()),
            ReportCategory::Import => Self::Import(Vec::new()),
            ReportCategory::Export => Self::Export(Vec::new()),
        }
    }

    /// The category these records came from.
    #[must_use]
    pub const fn category(&self) -> ReportCategory {
        match self {
            Self::Production(_) => ReportCategory::Production,
            Self::Processing(_) => ReportCategory::Processing,
            Self::Commercialization(_) => ReportCategory::Commercialization,
            Self::Import(_) => ReportCategory::Import,
            Self::Export(_) => ReportCategory::Export,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Production(records) => records.len(),
            Self::Processing(records) => records.len(),
            Self::Commercialization(records) => records.len(),
            Self::Import(records) | Self::Export(records) => records.len(),
        }
    }

    /// Whether the report has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
