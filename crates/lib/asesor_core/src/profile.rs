//! Business profile — store identity, catalog and payment methods.
//!
//! The profile is either the built-in store, an inline JSON document
//! (`BUSINESS_CONFIG_JSON`) or a JSON file (`BUSINESS_CONFIG`). File and
//! inline sources are re-read on every [`ProfileSource::load`] so edits take
//! effect without a restart.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a business profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Cannot read profile file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// A catalog item priced in US dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, price_usd: f64) -> Self {
        Self {
            name: name.into(),
            price_usd,
            category: None,
        }
    }
}

/// Everything the assistant needs to know about the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub store_name: String,
    pub advisor_name: String,
    pub city: String,
    pub address: String,
    pub hours: String,
    /// WhatsApp number in international format, digits only.
    pub whatsapp: String,
    /// Symbol of the local currency used for reference prices.
    pub local_currency: String,
    pub payment_methods: Vec<String>,
    pub products: Vec<Product>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            store_name: "ElectroVentas Cumaná".into(),
            advisor_name: "Javier".into(),
            city: "Cumaná".into(),
            address: "Av. Bermúdez, Cumaná, estado Sucre".into(),
            hours: "Lunes a sábado de 8:30 a. m. a 5:30 p. m.".into(),
            whatsapp: "584140000000".into(),
            local_currency: "Bs".into(),
            payment_methods: vec![
                "Zelle".into(),
                "Binance".into(),
                "Efectivo".into(),
                "Pago Móvil".into(),
            ],
            products: vec![
                Product::new("Smart TV 55\" Samsung", 450.0),
                Product::new("Licuadora Oster", 65.0),
                Product::new("Aire Acondicionado 12k BTU", 310.0),
                Product::new("Plancha Black+Decker", 25.0),
            ],
        }
    }
}

/// Public subset of the profile served by `GET /config`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub store_name: String,
    pub advisor_name: String,
    pub city: String,
    pub address: String,
    pub hours: String,
    pub whatsapp: String,
    pub payment_methods: Vec<String>,
    pub products: Vec<Product>,
}

impl BusinessProfile {
    /// Parse a profile from JSON. Missing fields take the built-in values.
    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject profiles the prompt cannot be rendered from.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.store_name.trim().is_empty() {
            return Err(ProfileError::Invalid("storeName must not be empty".into()));
        }
        if self.advisor_name.trim().is_empty() {
            return Err(ProfileError::Invalid(
                "advisorName must not be empty".into(),
            ));
        }
        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(ProfileError::Invalid("product name must not be empty".into()));
            }
            if !product.price_usd.is_finite() || product.price_usd < 0.0 {
                return Err(ProfileError::Invalid(format!(
                    "invalid price for '{}': {}",
                    product.name, product.price_usd
                )));
            }
        }
        Ok(())
    }

    /// Status line shown by `GET /`.
    pub fn status_line(&self) -> String {
        format!("{} activo", self.advisor_name)
    }

    /// `wa.me` link for the contact button, if a number is configured.
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self.whatsapp.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            None
        } else {
            Some(format!("https://wa.me/{digits}"))
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            store_name: self.store_name.clone(),
            advisor_name: self.advisor_name.clone(),
            city: self.city.clone(),
            address: self.address.clone(),
            hours: self.hours.clone(),
            whatsapp: self.whatsapp.clone(),
            payment_methods: self.payment_methods.clone(),
            products: self.products.clone(),
        }
    }
}

/// Where the business profile comes from.
#[derive(Debug, Clone)]
pub enum ProfileSource {
    /// Fixed profile, usually the built-in one.
    Static(BusinessProfile),
    /// JSON file re-read on every load.
    File(PathBuf),
    /// Inline JSON document.
    Json(String),
}

impl Default for ProfileSource {
    fn default() -> Self {
        Self::Static(BusinessProfile::default())
    }
}

impl ProfileSource {
    /// Resolve the source from the environment.
    ///
    /// | Variable               | Meaning                               |
    /// |------------------------|---------------------------------------|
    /// | `BUSINESS_CONFIG_JSON` | inline JSON profile (highest priority) |
    /// | `BUSINESS_CONFIG`      | path to a JSON profile file           |
    ///
    /// With neither set the built-in profile is used.
    pub fn from_env() -> Self {
        if let Ok(raw) = env::var("BUSINESS_CONFIG_JSON")
            && !raw.trim().is_empty()
        {
            return Self::Json(raw);
        }
        match env::var("BUSINESS_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::default(),
        }
    }

    /// Load and validate the profile.
    pub fn load(&self) -> Result<BusinessProfile, ProfileError> {
        match self {
            Self::Static(profile) => {
                profile.validate()?;
                Ok(profile.clone())
            }
            Self::Json(raw) => BusinessProfile::from_json(raw),
            Self::File(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
                    path: path.clone(),
                    source,
                })?;
                BusinessProfile::from_json(&raw)
            }
        }
    }

    /// Short description for startup logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Static(profile) => format!("built-in ({})", profile.store_name),
            Self::File(path) => format!("file {}", path.display()),
            Self::Json(_) => "inline JSON".to_string(),
        }
    }
}
