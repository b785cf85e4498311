//! Static pages

use axum::response::Html;

const PREDICTION_PAGE: &str = include_str!("../../templates/prediction.html");
const ABOUT_PAGE: &str = include_str!("../../templates/about.html");

pub async fn prediction_html() -> Html<&'static str> {
    Html(PREDICTION_PAGE)
}

pub async fn about_html() -> Html<&'static str> {
    Html(ABOUT_PAGE)
}
