use leptos::prelude::*;

use crate::model::{LINKS, NodeData, find_node};

fn label_of(id: &'static str) -> &'static str {
	find_node(id).map_or(id, |n| n.label)
}

fn tag_list(title: &'static str, items: Vec<&'static str>) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<div class="info-section">
				<h4>{title}</h4>
				<ul class="tags">
					{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
				</ul>
			</div>
		}
	})
}

/// Slide-over with everything the catalog knows about one node.
#[component]
pub fn InfoPanel(
	/// Node to describe.
	node: &'static NodeData,
	/// Called by the close button.
	on_close: Callback<()>,
) -> impl IntoView {
	let details = node.details.unwrap_or_default();
	let uses: Vec<_> = LINKS.iter().filter(|l| l.source == node.id).map(|l| label_of(l.target)).collect();
	let used_by: Vec<_> = LINKS.iter().filter(|l| l.target == node.id).map(|l| label_of(l.source)).collect();

	view! {
		<aside class="info-panel" style:border-top-color=node.accent()>
			<header class="info-header">
				<div>
					<span class="info-kind">{node.kind.display_name()}</span>
					<h3>{node.label}</h3>
				</div>
				<button class="close" on:click=move |_| on_close.run(())>"×"</button>
			</header>
			<p class="info-description">{node.description}</p>
			{node.context_file.map(|file| view! {
				<div class="info-section">
					<h4>"Context"</h4>
					<code>{file}</code>
				</div>
			})}
			{details.mission.map(|mission| view! {
				<div class="info-section">
					<h4>"Mission"</h4>
					<p>{mission}</p>
				</div>
			})}
			{tag_list("Skills", details.skills_used.to_vec())}
			{tag_list("Connectors", details.connectors_used.to_vec())}
			{tag_list("Calls", uses)}
			{tag_list("Called by", used_by)}
			{details.special.map(|note| view! {
				<div class="info-section safety">
					<h4>"Safety"</h4>
					<p>{note}</p>
				</div>
			})}
		</aside>
	}
}
