use leptos::prelude::*;

/// 404 page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="neural-page">
			<div class="panel">
				<h1>"Lost in space"</h1>
				<p>"Nothing orbits here."</p>
				<a href="/">"Back to the graph"</a>
			</div>
		</main>
	}
}
