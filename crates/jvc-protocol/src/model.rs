//! Known projector models.
//!
//! Each model answers `model_status.query` with a 14-byte payload of the form
//! `ILAFPJ -- XXXX`. Several models share a payload, so a payload identifies
//! a family rather than a single model. The model also decides which of the
//! overlapping picture mode command groups applies.

use jvc_core::{Error, Result};

/// A projector model and its `model_status` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JvcModel {
    pub name: &'static str,
    pub status_payload: &'static [u8; 14],
}

impl std::fmt::Display for JvcModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

const fn m(name: &'static str, status_payload: &'static [u8; 14]) -> JvcModel {
    JvcModel {
        name,
        status_payload,
    }
}

// The B5Ax codes are not in the published guide; they were read from
// real NZ-series projectors.
static MODELS: &[JvcModel] = &[
    m("DLA-NZ9", b"ILAFPJ -- B5A1"),
    m("DLA-RS4100", b"ILAFPJ -- B5A1"),
    m("DLA-NZ8", b"ILAFPJ -- B5A2"),
    m("DLA-RS3100", b"ILAFPJ -- B5A2"),
    m("DLA-NZ7", b"ILAFPJ -- B5A3"),
    m("DLA-RS2100", b"ILAFPJ -- B5A3"),
    m("DLA-HD350", b"ILAFPJ -- -XH4"),
    m("DLA-RS10", b"ILAFPJ -- -XH7"),
    m("DLA-HD750", b"ILAFPJ -- -XH5"),
    m("DLA-RS20", b"ILAFPJ -- -XH5"),
    m("DLA-HD550", b"ILAFPJ -- -XH8"),
    m("DLA-RS15", b"ILAFPJ -- -XHA"),
    m("DLA-HD950", b"ILAFPJ -- -XH9"),
    m("DLA-HD990", b"ILAFPJ -- -XH9"),
    m("DLA-RS25", b"ILAFPJ -- -XH9"),
    m("DLA-RS35", b"ILAFPJ -- -XH9"),
    m("DLA-X3", b"ILAFPJ -- -XHB"),
    m("DLA-RS40", b"ILAFPJ -- -XHB"),
    m("DLA-X7", b"ILAFPJ -- -XHC"),
    m("DLA-X9", b"ILAFPJ -- -XHC"),
    m("DLA-RS50", b"ILAFPJ -- -XHC"),
    m("DLA-RS60", b"ILAFPJ -- -XHC"),
    m("DLA-X30", b"ILAFPJ -- -XHE"),
    m("DLA-RS45", b"ILAFPJ -- -XHE"),
    m("DLA-X70R", b"ILAFPJ -- -XHF"),
    m("DLA-X90R", b"ILAFPJ -- -XHF"),
    m("DLA-RS55", b"ILAFPJ -- -XHF"),
    m("DLA-RS65", b"ILAFPJ -- -XHF"),
];

/// Models that understand the two-byte picture mode codes.
pub(crate) const PICTURE_MODE_V1_MODELS: &[&str] = &[
    "DLA-X30", "DLA-RS45", "DLA-X70R", "DLA-X90R", "DLA-RS55", "DLA-RS65",
];

pub(crate) const PICTURE_MODE_V2_MODELS: &[&str] =
    &["DLA-X3", "DLA-RS40", "DLA-X7", "DLA-X9", "DLA-RS50", "DLA-RS60"];

pub(crate) const PICTURE_MODE_V3_MODELS: &[&str] = &[
    "DLA-HD350", "DLA-HD750", "DLA-HD550", "DLA-HD950", "DLA-HD990", "DLA-RS10", "DLA-RS20",
    "DLA-RS15", "DLA-RS25", "DLA-RS35",
];

/// All known models, in table order.
#[must_use]
pub fn models() -> &'static [JvcModel] {
    MODELS
}

/// Look up a model by name, ignoring ASCII case.
///
/// # Errors
/// Returns `Error::UnknownModel` if no model has that name.
///
/// # Example
///
/// ```
/// let model = jvc_protocol::model("dla-nz8").unwrap();
/// assert_eq!(model.name, "DLA-NZ8");
/// assert_eq!(model.status_payload, b"ILAFPJ -- B5A2");
/// ```
pub fn model(name: &str) -> Result<&'static JvcModel> {
    MODELS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownModel(name.to_string()))
}

/// First model reporting the given `model_status` payload.
#[must_use]
pub fn model_from_status_payload(payload: &[u8]) -> Option<&'static JvcModel> {
    MODELS.iter().find(|m| m.status_payload.as_slice() == payload)
}

/// Distinct status payloads in table order, each with the names of the
/// models that report it.
pub(crate) fn models_by_status_payload() -> Vec<(&'static [u8], Vec<&'static str>)> {
    let mut grouped: Vec<(&'static [u8], Vec<&'static str>)> = Vec::new();
    for model in MODELS {
        match grouped
            .iter_mut()
            .find(|(payload, _)| *payload == model.status_payload.as_slice())
        {
            Some((_, names)) => names.push(model.name),
            None => grouped.push((model.status_payload.as_slice(), vec![model.name])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_lookup() {
        assert_eq!(model("DLA-X70R").unwrap().status_payload, b"ILAFPJ -- -XHF");
        assert!(matches!(model("DLA-ZZ1"), Err(Error::UnknownModel(_))));
    }

    #[test]
    fn test_model_from_payload_returns_first() {
        let found = model_from_status_payload(b"ILAFPJ -- -XH9").unwrap();
        assert_eq!(found.name, "DLA-HD950");
        assert!(model_from_status_payload(b"ILAFPJ -- ????").is_none());
    }

    #[test]
    fn test_grouping_by_payload() {
        let grouped = models_by_status_payload();
        assert_eq!(grouped.len(), 13);
        let (payload, names) = &grouped[1];
        assert_eq!(*payload, b"ILAFPJ -- B5A2");
        assert_eq!(names, &vec!["DLA-NZ8", "DLA-RS3100"]);
    }

    #[test]
    fn test_picture_mode_model_lists_are_known() {
        for name in PICTURE_MODE_V1_MODELS
            .iter()
            .chain(PICTURE_MODE_V2_MODELS)
            .chain(PICTURE_MODE_V3_MODELS)
        {
            assert!(model(name).is_ok(), "{name}");
        }
    }
}
