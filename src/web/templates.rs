//! HTML for the two reader-facing pages.
//!
//! Each function returns a String ready to wrap in an axum `Html` response.
//! All market-derived text goes through `esc` before landing in markup.

use crate::types::Article;

/// Base page shell with shared head and footer.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Polymarket Times</title>
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    <header class="masthead">
        <h1><a href="/">Polymarket Times</a></h1>
        <p class="tagline">News from the prediction markets</p>
    </header>
    <main class="content">
{content}
    </main>
    <footer class="footer">
        <p>Articles refresh hourly from Polymarket data.</p>
    </footer>
</body>
</html>"#,
        title = esc(title),
        content = content,
    )
}

/// Homepage: one featured article, up to five recent ones, then the full list.
pub fn index_page(featured: Option<&Article>, recent: &[Article], articles: &[Article]) -> String {
    let mut content = String::new();

    match featured {
        Some(a) => {
            content.push_str(&format!(
                r#"        <section class="featured">
            <img src="{image}" alt="">
            <span class="category">{category}</span>
            <h2><a href="/article/{id}">{title}</a></h2>
            <p class="probability">Probability: {probability}%</p>
        </section>
"#,
                image = esc(&a.image),
                category = esc(&a.category),
                id = esc(&a.id),
                title = esc(&a.title),
                probability = esc(&a.probability),
            ));
        }
        None => {
            content.push_str(
                "        <section class=\"featured empty\">\n            <p>No articles yet. Check back after the next refresh.</p>\n        </section>\n",
            );
        }
    }

    if !recent.is_empty() {
        content.push_str("        <section class=\"recent\">\n            <h3>Recent</h3>\n            <ul>\n");
        for a in recent {
            content.push_str(&format!(
                "                <li><a href=\"/article/{id}\">{title}</a> <span class=\"category\">{category}</span></li>\n",
                id = esc(&a.id),
                title = esc(&a.title),
                category = esc(&a.category),
            ));
        }
        content.push_str("            </ul>\n        </section>\n");
    }

    content.push_str("        <section class=\"all-articles\">\n");
    for a in articles {
        content.push_str(&format!(
            r#"            <article class="card">
                <span class="category">{category}</span>
                <h4><a href="/article/{id}">{title}</a></h4>
                <p>{probability}% &middot; ${volume:.0} volume</p>
            </article>
"#,
            category = esc(&a.category),
            id = esc(&a.id),
            title = esc(&a.title),
            probability = esc(&a.probability),
            volume = a.volume,
        ));
    }
    content.push_str("        </section>");

    base_template("Home", &content)
}

/// Article detail page.
pub fn article_page(article: &Article) -> String {
    let content = format!(
        r#"        <article class="detail">
            <img src="{image}" alt="">
            <span class="category">{category}</span>
            <h2>{title}</h2>
            <p class="probability">Current probability: {probability}%</p>
            <div class="summary">{summary}</div>
            <p class="volume">Volume: ${volume:.0}</p>
            <p><a href="{market_url}" rel="noopener">View this market on Polymarket</a></p>
            <p><a href="/">&larr; Back to all articles</a></p>
        </article>"#,
        image = esc(&article.image),
        category = esc(&article.category),
        title = esc(&article.title),
        probability = esc(&article.probability),
        summary = esc(&article.summary),
        volume = article.volume,
        market_url = esc(&article.market_url),
    );

    base_template(&article.title, &content)
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
