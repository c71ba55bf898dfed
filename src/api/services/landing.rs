use actix_web::{HttpResponse, Responder, web};

use super::ExporterSettings;

/// Informational root page
pub struct LandingService;

impl LandingService {
    pub async fn index(settings: web::Data<ExporterSettings>) -> impl Responder {
        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_landing_page(&settings.metrics_path))
    }
}

fn render_landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Endpoint Exporter</title></head>\n\
         <body>\n\
         <h1>Endpoint Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        escape_html(metrics_path)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_links_metrics_path() {
        let page = render_landing_page("/custom");
        assert!(page.contains("<title>Endpoint Exporter</title>"));
        assert!(page.contains("<a href='/custom'>Metrics</a>"));
    }

    #[test]
    fn test_page_escapes_metrics_path() {
        let page = render_landing_page("/m'><script>");
        assert!(page.contains("<a href='/m&#39;&gt;&lt;script&gt;'>Metrics</a>"));
        assert!(!page.contains("<script>"));
    }
}
