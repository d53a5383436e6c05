//! Page model types and markup extraction shared by all retailer adapters

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::TrackError;

/// CSS selectors describing where a retailer's product page keeps its
/// color groups, sizes, and not-found marker.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// Container for one group of colors sharing a price
    pub color_group: String,
    /// Price element within a color group
    pub group_price: String,
    /// Selectable color swatch within a color group
    pub swatch: String,
    /// Attribute on a swatch carrying the color name (falls back to `title`)
    pub swatch_name_attr: String,
    /// Class marking the currently selected color group
    pub selected_class: String,
    /// Size input control
    pub size_input: String,
    /// Attribute on a size control carrying the size label (falls back to `id`)
    pub size_name_attr: String,
    /// Marker element present on the retailer's "product gone" page
    pub not_found: String,
}

impl PageSelectors {
    /// Compiles the selector set once, at adapter construction.
    ///
    /// A selector that fails to compile is a configuration defect and
    /// surfaces here rather than on every fetch.
    pub fn compile(&self) -> Result<CompiledSelectors, TrackError> {
        Ok(CompiledSelectors {
            color_group: compile(&self.color_group)?,
            group_price: compile(&self.group_price)?,
            swatch: compile(&self.swatch)?,
            size_input: compile(&self.size_input)?,
            not_found: compile(&self.not_found)?,
            swatch_name_attr: self.swatch_name_attr.clone(),
            selected_class: self.selected_class.clone(),
            size_name_attr: self.size_name_attr.clone(),
        })
    }
}

fn compile(selector: &str) -> Result<Selector, TrackError> {
    Selector::parse(selector).map_err(|e| TrackError::Selector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

/// Selector set parsed at adapter construction.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    color_group: Selector,
    group_price: Selector,
    swatch: Selector,
    size_input: Selector,
    not_found: Selector,
    swatch_name_attr: String,
    selected_class: String,
    size_name_attr: String,
}

/// Colors sharing one displayed price.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub colors: Vec<String>,
    pub price: f64,
    /// Whether the page flags this group as the currently selected one.
    pub selected: bool,
}

/// One size control and its purchasability.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSize {
    pub name: String,
    pub available: bool,
}

/// Structured snapshot of one fetched product page.
///
/// Built fresh per fetch, consumed by variant resolution, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageModel {
    pub color_groups: Vec<ColorGroup>,
    pub sizes: Vec<ArticleSize>,
}

/// Outcome of fetching and parsing a product page.
#[derive(Debug)]
pub enum PageOutcome {
    Found(PageModel),
    /// The retailer's own "this product is gone" page.
    NotFound,
}

/// Whether the document is the retailer's not-found page.
pub fn is_not_found_page(document: &Html, selectors: &CompiledSelectors) -> bool {
    document.select(&selectors.not_found).next().is_some()
}

/// Extracts a page model from a parsed product page.
///
/// Extraction degrades per element: an unparsable price or a swatch
/// without a readable name costs only that value, never the whole page.
pub fn extract_page_model(document: &Html, selectors: &CompiledSelectors) -> PageModel {
    let mut color_groups = Vec::new();

    for group in document.select(&selectors.color_group) {
        let price = group
            .select(&selectors.group_price)
            .next()
            .and_then(|el| parse_price_text(&element_text(el)))
            .unwrap_or_else(|| {
                debug!("Color group without a parsable price, defaulting to 0");
                0.0
            });

        let colors: Vec<String> = group
            .select(&selectors.swatch)
            .filter_map(|swatch| {
                swatch
                    .value()
                    .attr(&selectors.swatch_name_attr)
                    .or_else(|| swatch.value().attr("title"))
                    .map(|name| name.trim().to_string())
            })
            .filter(|name| !name.is_empty())
            .collect();

        let selected = has_class(group, &selectors.selected_class);

        color_groups.push(ColorGroup {
            colors,
            price,
            selected,
        });
    }

    let sizes = document
        .select(&selectors.size_input)
        .filter_map(|input| {
            let name = input
                .value()
                .attr(&selectors.size_name_attr)
                .or_else(|| input.value().attr("id"))?
                .trim()
                .to_string();

            if name.is_empty() {
                return None;
            }

            // Availability is the inverse of the control's disabled marker
            let available =
                input.value().attr("disabled").is_none() && !has_class(input, "disabled");

            Some(ArticleSize { name, available })
        })
        .collect();

    PageModel { color_groups, sizes }
}

/// Parses a displayed price like `"$ 118.00"`, `"119,99 €"` or
/// `"1.299,00"` into a numeric amount.
///
/// Strips everything but digits and separators, then treats whichever
/// separator comes last as the decimal point and drops the other as
/// thousands grouping. Returns `None` when nothing numeric survives.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|attr| attr.split_whitespace().any(|c| c == class))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_selectors() -> CompiledSelectors {
        PageSelectors {
            color_group: ".color-group".to_string(),
            group_price: ".group-price".to_string(),
            swatch: ".swatch".to_string(),
            swatch_name_attr: "data-color-name".to_string(),
            selected_class: "is-selected".to_string(),
            size_input: ".sizes input".to_string(),
            size_name_attr: "value".to_string(),
            not_found: ".page-not-found".to_string(),
        }
        .compile()
        .expect("test selectors must compile")
    }

    #[test]
    fn price_text_parses_common_formats() {
        assert_eq!(parse_price_text("$ 118.00"), Some(118.0));
        assert_eq!(parse_price_text("118 USD"), Some(118.0));
        assert_eq!(parse_price_text("119,99 €"), Some(119.99));
        assert_eq!(parse_price_text("1,299.00"), Some(1299.0));
        assert_eq!(parse_price_text("1.299,00"), Some(1299.0));
    }

    #[test]
    fn price_text_without_digits_is_none() {
        assert_eq!(parse_price_text("N/A"), None);
        assert_eq!(parse_price_text(""), None);
        assert_eq!(parse_price_text("sold out"), None);
    }

    #[test]
    fn unparsable_group_price_defaults_to_zero_and_keeps_other_groups() {
        let html = Html::parse_document(
            r#"
            <div class="color-group">
              <span class="group-price">N/A</span>
              <button class="swatch" data-color-name="Black"></button>
            </div>
            <div class="color-group">
              <span class="group-price">$ 89.00</span>
              <button class="swatch" data-color-name="Grey"></button>
            </div>
            "#,
        );

        let model = extract_page_model(&html, &test_selectors());

        assert_eq!(model.color_groups.len(), 2);
        assert_eq!(model.color_groups[0].price, 0.0);
        assert_eq!(model.color_groups[0].colors, vec!["Black"]);
        assert_eq!(model.color_groups[1].price, 89.0);
    }

    #[test]
    fn selected_flag_and_swatch_fallback_are_preserved() {
        let html = Html::parse_document(
            r#"
            <div class="color-group is-selected">
              <span class="group-price">$ 118.00</span>
              <button class="swatch" data-color-name="Black"></button>
              <button class="swatch" title="True Navy"></button>
              <button class="swatch"></button>
            </div>
            "#,
        );

        let model = extract_page_model(&html, &test_selectors());

        assert_eq!(model.color_groups.len(), 1);
        let group = &model.color_groups[0];
        assert!(group.selected);
        // The nameless swatch degrades alone; the rest survive
        assert_eq!(group.colors, vec!["Black", "True Navy"]);
    }

    #[test]
    fn size_availability_is_inverse_of_disabled_marker() {
        let html = Html::parse_document(
            r#"
            <div class="sizes">
              <input type="radio" value="M">
              <input type="radio" value="L" disabled>
              <input type="radio" class="disabled" value="XL">
              <input type="radio" value="">
            </div>
            "#,
        );

        let model = extract_page_model(&html, &test_selectors());

        assert_eq!(
            model.sizes,
            vec![
                ArticleSize { name: "M".to_string(), available: true },
                ArticleSize { name: "L".to_string(), available: false },
                ArticleSize { name: "XL".to_string(), available: false },
            ]
        );
    }

    #[test]
    fn not_found_marker_is_detected() {
        let gone = Html::parse_document(r#"<h1 class="page-not-found">Lost?</h1>"#);
        let live = Html::parse_document(r#"<div class="color-group"></div>"#);

        assert!(is_not_found_page(&gone, &test_selectors()));
        assert!(!is_not_found_page(&live, &test_selectors()));
    }
}
