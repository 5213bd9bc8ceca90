//! DOM side of the page-ready helpers.

use swash_core::page::{FEATURED_CLASS, is_external_link, pick_featured_color};
use web_sys::Document;

/// Give every featured project card a random color class.
pub fn color_featured_projects(document: &Document) -> usize {
    let cards = document.get_elements_by_class_name(FEATURED_CLASS);
    let mut colored = 0;
    for i in 0..cards.length() {
        let Some(card) = cards.item(i) else {
            continue;
        };
        let color = pick_featured_color(js_sys::Math::random());
        match card.class_list().add_1(color) {
            Ok(()) => colored += 1,
            Err(e) => log::warn!("could not color featured project {i}: {e:?}"),
        }
    }
    log::debug!("colored {colored} featured projects");
    colored
}

/// Open links to other hosts in a new tab.
pub fn fix_targets(document: &Document) -> usize {
    let page_url = document
        .location()
        .and_then(|loc| loc.href().ok())
        .unwrap_or_default();

    let links = document.get_elements_by_tag_name("a");
    let mut rewritten = 0;
    for i in 0..links.length() {
        let Some(link) = links.item(i) else {
            continue;
        };
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        if !is_external_link(&href, &page_url) {
            continue;
        }
        let result = link
            .set_attribute("target", "_blank")
            .and_then(|()| link.set_attribute("rel", "noopener noreferrer"));
        match result {
            Ok(()) => rewritten += 1,
            Err(e) => log::warn!("could not retarget {href}: {e:?}"),
        }
    }
    log::debug!("opened {rewritten} external links in new tabs");
    rewritten
}
