use eframe::egui::Color32;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Status classification (map marker colors)
// ---------------------------------------------------------------------------

/// Category a record falls into for map coloring, from the two status
/// columns. Declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusCategory {
    Discarded,
    FullyCompatible,
    PartiallyCompatible,
    GeoOnly,
    Incompatible,
    SelectedForValidation,
    Unclassified,
}

/// Which status column a rule inspects.
#[derive(Debug, Clone, Copy)]
enum StatusField {
    Cadastro,
    Comparacao,
}

/// Ordered rule table, evaluated top-down with first match winning. A record
/// that is both discarded and fully compatible classifies as discarded;
/// swapping any two rows changes that outcome, so the order is load-bearing.
const PRIORITY: &[(StatusField, &str, StatusCategory)] = &[
    (StatusField::Cadastro, "descartado", StatusCategory::Discarded),
    (
        StatusField::Comparacao,
        "totalmente compatível",
        StatusCategory::FullyCompatible,
    ),
    (
        StatusField::Comparacao,
        "compatível parcialmente",
        StatusCategory::PartiallyCompatible,
    ),
    (
        StatusField::Comparacao,
        "compatível apenas geograficamente",
        StatusCategory::GeoOnly,
    ),
    (
        StatusField::Comparacao,
        "incompatível",
        StatusCategory::Incompatible,
    ),
    (
        StatusField::Cadastro,
        "selecionado para validação",
        StatusCategory::SelectedForValidation,
    ),
];

/// Classify a record by its two status fields (lowercased substring match).
pub fn classify(status_cadastro: &str, status_comparacao: &str) -> StatusCategory {
    let cadastro = status_cadastro.to_lowercase();
    let comparacao = status_comparacao.to_lowercase();
    for (field, needle, category) in PRIORITY {
        let haystack = match field {
            StatusField::Cadastro => &cadastro,
            StatusField::Comparacao => &comparacao,
        };
        if haystack.contains(needle) {
            return *category;
        }
    }
    StatusCategory::Unclassified
}

impl StatusCategory {
    /// Legend order (matches precedence, unclassified last).
    pub const ALL: [StatusCategory; 7] = [
        StatusCategory::Discarded,
        StatusCategory::FullyCompatible,
        StatusCategory::PartiallyCompatible,
        StatusCategory::GeoOnly,
        StatusCategory::Incompatible,
        StatusCategory::SelectedForValidation,
        StatusCategory::Unclassified,
    ];

    pub fn color(self) -> Color32 {
        match self {
            StatusCategory::Discarded => Color32::from_rgb(0xDC, 0x14, 0x3C),
            StatusCategory::FullyCompatible => Color32::from_rgb(0x28, 0xA7, 0x45),
            StatusCategory::PartiallyCompatible => Color32::from_rgb(0xFF, 0xC1, 0x07),
            StatusCategory::GeoOnly => Color32::from_rgb(0xFF, 0x8C, 0x00),
            StatusCategory::Incompatible => Color32::from_rgb(0x8B, 0x00, 0x00),
            StatusCategory::SelectedForValidation => Color32::from_rgb(0x00, 0x7B, 0xFF),
            StatusCategory::Unclassified => Color32::from_rgb(0x80, 0x80, 0x80),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusCategory::Discarded => "Descartado",
            StatusCategory::FullyCompatible => "Totalmente compatível",
            StatusCategory::PartiallyCompatible => "Parcialmente compatível",
            StatusCategory::GeoOnly => "Compatível geograficamente",
            StatusCategory::Incompatible => "Incompatível",
            StatusCategory::SelectedForValidation => "Selecionado para validação",
            StatusCategory::Unclassified => "Sem classificação",
        }
    }
}

// ---------------------------------------------------------------------------
// Table cell tinting
// ---------------------------------------------------------------------------

/// Background/foreground tint for a status cell in the table, a coarser
/// green/yellow/red scheme than the map categories. `None` leaves the cell
/// unstyled.
pub fn cell_tint(value: &str) -> Option<(Color32, Color32)> {
    let v = value.to_lowercase();
    if v.is_empty() {
        return None;
    }
    if v.contains("totalmente compatível")
        || v.contains("selecionado")
        || v.contains("compatível com polígono")
    {
        // green
        Some((
            Color32::from_rgb(0xD4, 0xED, 0xDA),
            Color32::from_rgb(0x15, 0x57, 0x24),
        ))
    } else if v.contains("parcialmente") || v.contains("apenas geograficamente") {
        // yellow
        Some((
            Color32::from_rgb(0xFF, 0xF3, 0xCD),
            Color32::from_rgb(0x85, 0x64, 0x04),
        ))
    } else if v.contains("incompatível") || v.contains("descartado") {
        // red
        Some((
            Color32::from_rgb(0xF8, 0xD7, 0xDA),
            Color32::from_rgb(0x72, 0x1C, 0x24),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_takes_precedence_over_fully_compatible() {
        let category = classify("descartado por duplicidade", "totalmente compatível");
        assert_eq!(category, StatusCategory::Discarded);
        assert_eq!(category.color(), Color32::from_rgb(0xDC, 0x14, 0x3C));
    }

    #[test]
    fn comparison_rules_fire_in_declared_order() {
        assert_eq!(
            classify("Selecionado para validação", "Totalmente compatível"),
            StatusCategory::FullyCompatible
        );
        assert_eq!(
            classify("Selecionado para validação", "Compatível parcialmente"),
            StatusCategory::PartiallyCompatible
        );
        assert_eq!(
            classify(
                "Selecionado para validação",
                "Compatível apenas geograficamente"
            ),
            StatusCategory::GeoOnly
        );
        assert_eq!(
            classify("Selecionado para validação", "Incompatível"),
            StatusCategory::Incompatible
        );
    }

    #[test]
    fn selected_applies_when_no_comparison_matches() {
        assert_eq!(
            classify("Selecionado para validação", "Não aplicado"),
            StatusCategory::SelectedForValidation
        );
    }

    #[test]
    fn unknown_statuses_are_unclassified() {
        assert_eq!(classify("", ""), StatusCategory::Unclassified);
        assert_eq!(
            classify("qualquer coisa", "outra coisa"),
            StatusCategory::Unclassified
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            classify("DESCARTADO POR HIERARQUIA", ""),
            StatusCategory::Discarded
        );
    }

    #[test]
    fn incompatible_does_not_shadow_fully_compatible() {
        // "totalmente compatível" must hit rule 2 before the "incompatível"
        // substring rule ever runs
        assert_eq!(
            classify("", "totalmente compatível"),
            StatusCategory::FullyCompatible
        );
    }

    #[test]
    fn cell_tint_classes() {
        assert!(cell_tint("Totalmente compatível").is_some());
        assert!(cell_tint("Compatível parcialmente").is_some());
        assert!(cell_tint("Descartado por duplicidade").is_some());
        assert_eq!(cell_tint("Não aplicado"), None);
        assert_eq!(cell_tint(""), None);

        let (green_bg, _) = cell_tint("Selecionado para validação").unwrap();
        assert_eq!(green_bg, Color32::from_rgb(0xD4, 0xED, 0xDA));
        let (red_bg, _) = cell_tint("Incompatível").unwrap();
        assert_eq!(red_bg, Color32::from_rgb(0xF8, 0xD7, 0xDA));
    }
}
