use leptos::callback::Callable;
use leptos::prelude::*;
use log::debug;

use crate::components::neural_canvas::{AboutSection, NeuralCanvas, Project, ProjectSelection};
use crate::pages::content::site_content;

#[component]
fn ProjectPanel(project: Project, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
	let links = [("Live demo", project.demo_url), ("Source", project.repo_url)]
		.into_iter()
		.filter_map(|(label, url)| url.map(|href| view! { <a href=href target="_blank">{label}</a> }))
		.collect_view();

	view! {
		<div class="panel" role="dialog">
			<h2>{project.title}</h2>
			<p>{project.description}</p>
			<ul class="tech">
				{project.tech.into_iter().map(|t| view! { <li>{t}</li> }).collect_view()}
			</ul>
			<div class="links">{links}</div>
			<button on:click=move |_| on_close.run(())>"Close"</button>
		</div>
	}
}

/// Portfolio landing page: the canvas plus the panels it opens.
#[component]
pub fn Home() -> impl IntoView {
	let content = RwSignal::new(site_content());
	let project = RwSignal::new(None::<String>);
	let about = RwSignal::new(None::<AboutSection>);
	let contact_open = RwSignal::new(false);

	let on_project_select = move |selection: Option<ProjectSelection>| {
		debug!("project selection: {selection:?}");
		project.set(selection.map(|s| s.id().to_string()));
	};

	let selected_project = move || {
		let id = project.get()?;
		content.with(|c| c.project(&id).cloned())
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<main class="neural-page">
				<NeuralCanvas
					content=content
					on_project_select=on_project_select
					on_about_select=move |section| about.set(Some(section))
					on_open_contact_modal=move |_| contact_open.set(true)
				/>
				{move || {
					selected_project()
						.map(|p| view! { <ProjectPanel project=p on_close=move |_| project.set(None) /> })
				}}
				{move || {
					about
						.get()
						.map(|section| {
							view! {
								<div class="panel" role="dialog" data-section=section.key()>
									<h2>{section.label()}</h2>
									<ul>
										{move || {
											content
												.with(|c| c.about_facts.clone())
												.into_iter()
												.map(|fact| view! { <li>{fact}</li> })
												.collect_view()
										}}
									</ul>
									<button on:click=move |_| about.set(None)>"Close"</button>
								</div>
							}
						})
				}}
				<Show when=move || contact_open.get()>
					<div class="panel" role="dialog">
						<h2>"Send a message"</h2>
						<textarea placeholder="Say hello" rows="5"></textarea>
						<button on:click=move |_| contact_open.set(false)>"Close"</button>
					</div>
				</Show>
			</main>
		</ErrorBoundary>
	}
}
