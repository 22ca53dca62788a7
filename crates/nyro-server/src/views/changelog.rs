//! Changelog page.

use nyro_renderer::escape_html;
use nyro_site::ChangelogPage;

use crate::SiteInfo;

pub(crate) fn changelog_page(info: &SiteInfo, page: &ChangelogPage) -> String {
    format!(
        r#"<div class="changelog"><div class="changelog-header"><h1>Changelog</h1><p>Tracking the evolution of {}.</p></div><div class="changelog-body prose">{}</div></div>"#,
        escape_html(&info.name),
        page.html
    )
}
