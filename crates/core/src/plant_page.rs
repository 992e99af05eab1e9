//! Public "plant story" page shown when a customer scans a QR label.
//!
//! Pages are self-contained HTML documents (inline CSS, no scripts). Every
//! value taken from the database or the query string is escaped.

use crate::types::DbId;

/// Hero image used when a plant type has no `image_url`.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/600x300.png?text=Beautiful+Plant";

/// Story shown when a plant type has none recorded.
pub const DEFAULT_STORY: &str = "This plant has a story of its own. It started as a small \
    cutting in the warmth of our greenhouses and was cared for every day until it grew strong \
    enough to become part of your home.";

/// Everything the page needs to know about the plant and the scan.
#[derive(Debug, Clone, Default)]
pub struct PlantPage<'a> {
    pub nursery_name: &'a str,
    pub name: &'a str,
    pub scientific_name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub story: Option<&'a str>,
    pub image_url: Option<&'a str>,
    /// Batch id from the scanned code, if any.
    pub batch: Option<DbId>,
    /// Plant index from the scanned code, if any.
    pub plant: Option<i32>,
}

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background-color: #f8f6f3; color: #333; margin: 0; padding: 20px; }
.container { max-width: 600px; margin: auto; background: rgba(255, 255, 255, 0.7); border: 1px solid rgba(255, 255, 255, 0.3); border-radius: 15px; padding: 20px; box-shadow: 0 4px 15px rgba(0,0,0,0.05); }
.hero-image { width: 100%; border-radius: 15px; height: 300px; object-fit: cover; background-color: #e0e0e0; }
h1 { color: #28a745; text-align: center; }
h2 { color: #555; border-bottom: 2px solid #eee; padding-bottom: 10px; }
.scan { text-align: center; color: #777; font-size: 0.9rem; }
.care-guide { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; }
.care-item { background-color: #f0f9f0; padding: 15px; border-radius: 10px; text-align: center; }
.pro-tip { background: linear-gradient(145deg, #e8f5e8, #f0fdf0); border-radius: 15px; padding: 20px; margin: 20px 0; text-align: center; }
.footer { text-align: center; margin-top: 30px; font-size: 0.9rem; color: #666; }";

const CARE_GUIDE: &[(&str, &str)] = &[
    ("Light", "Bright, indirect light. A spot near a window is ideal."),
    ("Water", "Water when the top 2-3 cm of soil feel dry. Never leave standing water."),
    ("Feeding", "Feed once a month with liquid fertilizer during the growing season."),
    ("Temperature", "Prefers mild temperatures between 18 and 24 °C."),
];

/// Escape text for safe interpolation into HTML content and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Treat blank optional strings as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn scan_caption(batch: Option<DbId>, plant: Option<i32>) -> Option<String> {
    match (batch, plant) {
        (Some(b), Some(p)) => Some(format!("Plant #{p} from batch #{b}")),
        (Some(b), None) => Some(format!("Batch #{b}")),
        _ => None,
    }
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Render the story page for one plant type.
pub fn render_plant_page(page: &PlantPage<'_>) -> String {
    let nursery = escape_html(page.nursery_name);
    let name = escape_html(page.name);
    let image = escape_html(non_blank(page.image_url).unwrap_or(PLACEHOLDER_IMAGE_URL));
    let story = escape_html(non_blank(page.story).unwrap_or(DEFAULT_STORY));

    let mut body = String::new();
    body.push_str("<div class=\"container\">\n");
    body.push_str(&format!(
        "<img src=\"{image}\" alt=\"{name}\" class=\"hero-image\">\n"
    ));
    body.push_str("<h1>Welcome to your new family member</h1>\n");
    body.push_str(&format!("<h2>{name}</h2>\n"));
    if let Some(scientific) = non_blank(page.scientific_name) {
        body.push_str(&format!("<p><em>{}</em></p>\n", escape_html(scientific)));
    }
    if let Some(category) = non_blank(page.category) {
        body.push_str(&format!("<p>{}</p>\n", escape_html(category)));
    }
    body.push_str(&format!("<p><em>From {nursery}</em></p>\n"));
    if let Some(caption) = scan_caption(page.batch, page.plant) {
        body.push_str(&format!("<p class=\"scan\">{caption}</p>\n"));
    }

    body.push_str("<div class=\"story-section\">\n<h2>Its story</h2>\n");
    body.push_str(&format!("<p>{story}</p>\n</div>\n"));

    body.push_str("<div class=\"care-guide\">\n");
    for (title, text) in CARE_GUIDE {
        body.push_str(&format!(
            "<div class=\"care-item\"><strong>{title}</strong><p>{text}</p></div>\n"
        ));
    }
    body.push_str("</div>\n");

    body.push_str(
        "<div class=\"pro-tip\">\n<h3>A tip from the nursery</h3>\n\
         <p>Mist the leaves once a week. It keeps them hydrated, discourages aphids, \
         and gives them a healthy shine.</p>\n</div>\n",
    );
    body.push_str(&format!(
        "<div class=\"footer\">\n<p><strong>Keep growing with us</strong></p>\n\
         <p>Share a photo of your plant and tag {nursery}.</p>\n</div>\n"
    ));
    body.push_str("</div>");

    document(&format!("{name} - {nursery}"), &body)
}

/// Page shown for an unknown plant type.
pub fn render_not_found(nursery_name: &str) -> String {
    let nursery = escape_html(nursery_name);
    document(
        &format!("Plant not found - {nursery}"),
        "<div class=\"container\"><h1>Plant not found</h1>\
         <p>We could not find this plant. The label may be damaged or out of date.</p></div>",
    )
}

/// Page shown when the plant could not be loaded.
pub fn render_server_error(nursery_name: &str) -> String {
    let nursery = escape_html(nursery_name);
    document(
        &format!("Error - {nursery}"),
        "<div class=\"container\"><h1>Server error</h1>\
         <p>Something went wrong on our side. Please try again in a moment.</p></div>",
    )
}
