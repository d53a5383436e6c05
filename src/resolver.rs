//! Pure variant resolution over a parsed page model

use crate::models::ObservationReason;
use crate::page::{ColorGroup, PageModel};

/// Price and availability determined for one requested (color, size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVariant {
    pub price: f64,
    pub available: bool,
    pub reason: ObservationReason,
}

impl ResolvedVariant {
    fn missing() -> Self {
        Self {
            price: 0.0,
            available: false,
            reason: ObservationReason::VariantMissing,
        }
    }
}

/// Resolves the requested variant against a page model.
///
/// A missing color group or size yields a zero-price/unavailable result
/// rather than an error: the variant having vanished from the page is
/// exactly what the history should record.
pub fn resolve_variant(page: &PageModel, color: &str, size: &str) -> ResolvedVariant {
    let Some(group) = select_color_group(page, color) else {
        return ResolvedVariant::missing();
    };

    let Some(article) = page.sizes.iter().find(|s| s.name == size) else {
        return ResolvedVariant::missing();
    };

    ResolvedVariant {
        price: group.price,
        available: article.available,
        reason: ObservationReason::Priced,
    }
}

/// An empty color requests the page's current default: the group flagged
/// as selected, or the first group when none is flagged.
fn select_color_group<'a>(page: &'a PageModel, color: &str) -> Option<&'a ColorGroup> {
    if color.is_empty() {
        page.color_groups
            .iter()
            .find(|g| g.selected)
            .or_else(|| page.color_groups.first())
    } else {
        page.color_groups
            .iter()
            .find(|g| g.colors.iter().any(|c| c == color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ArticleSize;

    fn page() -> PageModel {
        PageModel {
            color_groups: vec![
                ColorGroup {
                    colors: vec!["Black".to_string(), "True Navy".to_string()],
                    price: 42.0,
                    selected: false,
                },
                ColorGroup {
                    colors: vec!["Heathered Grey".to_string()],
                    price: 29.0,
                    selected: true,
                },
            ],
            sizes: vec![
                ArticleSize { name: "L".to_string(), available: true },
                ArticleSize { name: "XXL".to_string(), available: false },
            ],
        }
    }

    #[test]
    fn exact_color_and_size_match() {
        let resolved = resolve_variant(&page(), "Black", "L");

        assert_eq!(resolved.price, 42.0);
        assert!(resolved.available);
        assert_eq!(resolved.reason, ObservationReason::Priced);
    }

    #[test]
    fn size_present_but_sold_out() {
        let resolved = resolve_variant(&page(), "Black", "XXL");

        assert_eq!(resolved.price, 42.0);
        assert!(!resolved.available);
        assert_eq!(resolved.reason, ObservationReason::Priced);
    }

    #[test]
    fn missing_size_yields_zero_unavailable() {
        let resolved = resolve_variant(&page(), "Black", "XL");

        assert_eq!(resolved.price, 0.0);
        assert!(!resolved.available);
        assert_eq!(resolved.reason, ObservationReason::VariantMissing);
    }

    #[test]
    fn missing_color_yields_zero_unavailable() {
        let resolved = resolve_variant(&page(), "Chartreuse", "L");

        assert_eq!(resolved.price, 0.0);
        assert!(!resolved.available);
        assert_eq!(resolved.reason, ObservationReason::VariantMissing);
    }

    #[test]
    fn empty_color_uses_selected_group() {
        let resolved = resolve_variant(&page(), "", "L");

        assert_eq!(resolved.price, 29.0);
        assert!(resolved.available);
    }

    #[test]
    fn empty_color_falls_back_to_first_group_when_none_selected() {
        let mut model = page();
        for group in &mut model.color_groups {
            group.selected = false;
        }

        let resolved = resolve_variant(&model, "", "L");

        assert_eq!(resolved.price, 42.0);
    }

    #[test]
    fn empty_page_yields_zero_unavailable() {
        let resolved = resolve_variant(&PageModel::default(), "", "L");

        assert_eq!(resolved.price, 0.0);
        assert!(!resolved.available);
        assert_eq!(resolved.reason, ObservationReason::VariantMissing);
    }
}
