//! Country/zone registry
//!
//! Exact, case-sensitive lookup of export and import countries. An unknown
//! code is a package problem (a violation); duplicate or empty codes are
//! rejected when the registry is built.

use std::collections::HashMap;

use super::model::{ExportCountry, ImportCountry};
use crate::support::errors::{ConfigurationError, ViolationKind};

#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    export_countries: HashMap<String, ExportCountry>,
    import_countries: HashMap<String, ImportCountry>,
}

impl CountryRegistry {
    pub fn new(
        export_countries: Vec<ExportCountry>,
        import_countries: Vec<ImportCountry>,
    ) -> Result<Self, ConfigurationError> {
        let mut exports = HashMap::with_capacity(export_countries.len());
        for country in export_countries {
            let code = normalize_code(&country.code, "export")?;
            if exports.contains_key(&code) {
                return Err(ConfigurationError::DuplicateCountry {
                    registry: "export",
                    code,
                });
            }
            exports.insert(code.clone(), ExportCountry { code });
        }

        let mut imports = HashMap::with_capacity(import_countries.len());
        for country in import_countries {
            let code = normalize_code(&country.code, "import")?;
            if imports.contains_key(&code) {
                return Err(ConfigurationError::DuplicateCountry {
                    registry: "import",
                    code,
                });
            }
            imports.insert(
                code.clone(),
                ImportCountry {
                    code,
                    zone: country.zone,
                },
            );
        }

        Ok(Self {
            export_countries: exports,
            import_countries: imports,
        })
    }

    pub fn resolve_export(&self, code: &str) -> Result<&ExportCountry, ViolationKind> {
        self.export_countries
            .get(code)
            .ok_or_else(|| ViolationKind::IneligibleSender {
                country_code: code.to_string(),
            })
    }

    pub fn resolve_import(&self, code: &str) -> Result<&ImportCountry, ViolationKind> {
        self.import_countries
            .get(code)
            .ok_or_else(|| ViolationKind::IneligibleRecipient {
                country_code: code.to_string(),
            })
    }

    pub fn import_countries(&self) -> impl Iterator<Item = &ImportCountry> {
        self.import_countries.values()
    }

    pub fn export_count(&self) -> usize {
        self.export_countries.len()
    }

    pub fn import_count(&self) -> usize {
        self.import_countries.len()
    }
}

fn normalize_code(code: &str, registry: &'static str) -> Result<String, ConfigurationError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::Invalid(format!(
            "empty {} country code",
            registry
        )));
    }
    Ok(trimmed.to_string())
}

// ── Tests ──────────────────────────────────────────────────────
