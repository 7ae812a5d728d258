//! Standalone HTML for the share/print view.
//!
//! Plain-text fields are escaped. Rich-text bodies are `TrustedMarkup` and
//! are written verbatim, so whatever the editor stored reaches the page.

use super::renderer::{Band, Block, BlockContent, BlockEntry, ColumnNode, Node, VisualTree};

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
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

/// Only http(s) and mailto links become anchors.
fn safe_href(link: &str) -> Option<String> {
    let lower = link.trim().to_ascii_lowercase();
    ["http://", "https://", "mailto:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        .then(|| escape(link.trim()))
}

pub fn render_page(tree: &VisualTree, title: &str) -> String {
    let color = escape(&tree.theme_color);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(&format!(
        "<style>\n\
         body{{font-family:system-ui,sans-serif;margin:0;padding:2.5rem;border-top:20px solid {color}}}\n\
         .grid{{display:grid;gap:2rem}}\n\
         h2{{color:{color};font-size:.9rem;text-align:center}}\n\
         .entry{{margin:1rem 0;font-size:.8rem}}\n\
         .entry h3{{color:{color};font-size:.9rem;margin:0}}\n\
         hr.emphasized{{border-width:2px}}\n\
         @media print{{body{{padding:0}}}}\n\
         </style>\n"
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<main class=\"resume layout-{}\">\n",
        escape(tree.layout.as_str())
    ));
    push_band(&mut html, &tree.header);
    html.push_str(&format!(
        "<div class=\"grid\" style=\"grid-template-columns:repeat({},1fr)\">\n",
        tree.grid_columns
    ));
    for column in &tree.columns {
        push_column(&mut html, column);
    }
    html.push_str("</div>\n</main>\n</body>\n</html>\n");
    html
}

fn push_band(html: &mut String, band: &Band) {
    if band.nodes.is_empty() {
        return;
    }
    let class = if band.centered { "header centered" } else { "header" };
    let style = if band.centered { " style=\"text-align:center\"" } else { "" };
    html.push_str(&format!("<header class=\"{class}\"{style}>\n"));
    for node in &band.nodes {
        push_node(html, node);
    }
    html.push_str("</header>\n");
}

fn push_column(html: &mut String, column: &ColumnNode) {
    html.push_str(&format!(
        "<div class=\"column\" style=\"grid-column:span {}\">\n",
        column.span
    ));
    for node in &column.nodes {
        push_node(html, node);
    }
    html.push_str("</div>\n");
}

fn push_node(html: &mut String, node: &Node) {
    match node {
        Node::Rule { color, emphasized } => {
            let class = if *emphasized { " class=\"emphasized\"" } else { "" };
            html.push_str(&format!(
                "<hr{class} style=\"border-color:{}\">\n",
                escape(color)
            ));
        }
        Node::Block(block) => push_block(html, block),
    }
}

fn push_block(html: &mut String, block: &Block) {
    html.push_str("<section>\n");
    if let Some(heading) = block.heading {
        html.push_str(&format!("<h2>{}</h2>\n", escape(heading)));
    }
    match &block.content {
        BlockContent::Contact {
            name,
            job_title,
            lines,
        } => {
            if !name.is_empty() {
                html.push_str(&format!("<h1>{}</h1>\n", escape(name)));
            }
            if !job_title.is_empty() {
                html.push_str(&format!("<p class=\"job-title\">{}</p>\n", escape(job_title)));
            }
            for line in lines {
                html.push_str(&format!("<p class=\"contact\">{}</p>\n", escape(line)));
            }
        }
        BlockContent::Text { text } => {
            html.push_str(&format!("<p>{}</p>\n", escape(text)));
        }
        BlockContent::Entries { entries } => {
            for entry in entries {
                push_entry(html, entry);
            }
        }
        BlockContent::Items { items } => {
            html.push_str("<ul>\n");
            for item in items {
                html.push_str(&format!("<li>{}</li>\n", escape(item)));
            }
            html.push_str("</ul>\n");
        }
    }
    html.push_str("</section>\n");
}

fn push_entry(html: &mut String, entry: &BlockEntry) {
    html.push_str("<div class=\"entry\">\n");
    if !entry.title.is_empty() {
        html.push_str(&format!("<h3>{}</h3>\n", escape(&entry.title)));
    }
    if !entry.subtitle.is_empty() || !entry.detail.is_empty() {
        html.push_str(&format!(
            "<p class=\"meta\"><span>{}</span> <span>{}</span></p>\n",
            escape(&entry.subtitle),
            escape(&entry.detail)
        ));
    }
    if let Some(body) = &entry.body {
        html.push_str(&format!("<div class=\"body\">{}</div>\n", body.as_str()));
    }
    if let Some(link) = &entry.link {
        match safe_href(link) {
            Some(href) => html.push_str(&format!("<a href=\"{href}\">{}</a>\n", escape(link))),
            None => html.push_str(&format!("<p class=\"link\">{}</p>\n", escape(link))),
        }
    }
    html.push_str("</div>\n");
}
