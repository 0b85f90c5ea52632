use std::sync::Arc;

use components::{Binding, Errors, Form, Label, Loop, Output, Page, TextField, Zone};
use core_types::{Messages, StaticAsset};
use forms::{
    FieldInfo, FieldTranslationPipeline, FormSubmission, FormsConfig, MinLength, Required,
    StringTranslator, default_messages,
};
use markup::{MarkupConfig, MarkupTree};
use markup_test_support::{assert_lines_eq, markup_lines};
use persist::{
    DirtyTracked, InMemorySessionStore, PersistConfig, SessionPersistence, StoreOutcome,
};
use render::{RenderTree, Scheduler};

struct SignupPage {
    tree: RenderTree,
    form: Form,
    email: Binding<String>,
}

fn signup_page() -> SignupPage {
    let messages: Arc<dyn Messages> = Arc::new(default_messages());
    let page = Page::new("Sign up").with_stylesheet(StaticAsset::stylesheet("/site.css", true));
    let mut tree = RenderTree::new("page", page).unwrap();
    let form = Form::new("signup", "/signup", FormsConfig::default());
    let form_key = tree.add_child(tree.root(), "form", form.clone()).unwrap();

    let email = Binding::empty();
    let email_field = TextField::new(
        &form,
        FieldInfo::new("email", "Email"),
        FieldTranslationPipeline::new(StringTranslator, messages)
            .with_validator(Required)
            .with_validator(MinLength(5)),
        email.clone(),
    );
    tree.add_child(form_key, "errors", Errors::new(form.tracker(), ""))
        .unwrap();
    tree.add_child(
        form_key,
        "emailLabel",
        Label::new(email_field.handle(), form.tracker(), "error"),
    )
    .unwrap();
    tree.add_child(form_key, "email", email_field).unwrap();

    SignupPage { tree, form, email }
}

fn render(tree: &mut RenderTree) -> String {
    let mut markup = MarkupTree::new(MarkupConfig::default());
    Scheduler::default().render(tree, &mut markup).unwrap();
    markup.serialize()
}

#[test]
fn first_render_links_label_and_stylesheet() {
    let mut page = signup_page();
    let html = render(&mut page.tree);
    assert_lines_eq(
        &markup_lines(&html),
        &[
            "<!DOCTYPE html>",
            "<html>",
            "<head>",
            "<title>",
            "Sign up",
            "</title>",
            "<link rel=\"stylesheet\" href=\"/site.css\">",
            "</head>",
            "<body>",
            "<form method=\"post\" action=\"/signup\" id=\"signup\">",
            "<label for=\"email\">",
            "Email",
            "</label>",
            "<input type=\"text\" name=\"email\" id=\"email\" value=\"\" required=\"required\">",
            "<input type=\"hidden\" name=\"t:formdata\" value=\"e30\">",
            "</form>",
            "</body>",
            "</html>",
        ],
    );
}

#[test]
fn failed_submission_redisplays_input_and_errors() {
    let mut page = signup_page();
    render(&mut page.tree);

    let submission: FormSubmission = [("email", "ab")].into_iter().collect();
    assert!(!page.form.process_submission(&submission));
    assert_eq!(page.email.get(), None);

    let html = render(&mut page.tree);
    let lines = markup_lines(&html);
    let start = lines
        .iter()
        .position(|line| line.starts_with("<form"))
        .unwrap();
    assert_lines_eq(
        &lines[start + 1..start + 13],
        &[
            "<div class=\"t-error\">",
            "<ul>",
            "<li>",
            "You must provide at least 5 characters for Email.",
            "</li>",
            "</ul>",
            "</div>",
            "<label for=\"email\" class=\"error\">",
            "Email",
            "</label>",
            "<input type=\"text\" name=\"email\" id=\"email\" value=\"ab\" class=\"error\" required=\"required\">",
            lines[start + 12].as_str(),
        ],
    );

    let blob_line = &lines[start + 12];
    let blob = blob_line
        .split("value=\"")
        .nth(1)
        .and_then(|rest| rest.strip_suffix("\">"))
        .unwrap();
    let restored = signup_page();
    restored.form.restore_tracker(blob).unwrap();
    assert_eq!(
        restored.form.tracker().borrow().all_errors(),
        vec!["You must provide at least 5 characters for Email."]
    );
}

#[test]
fn valid_submission_binds_the_value() {
    let page = signup_page();
    let submission: FormSubmission = [("email", "ada@example.com")].into_iter().collect();
    assert!(page.form.process_submission(&submission));
    assert_eq!(page.email.get().as_deref(), Some("ada@example.com"));
    assert!(!page.form.tracker().borrow().has_errors());
}

#[test]
fn tracker_survives_the_redirect_through_session_storage() {
    let store = SessionPersistence::new(InMemorySessionStore::new(), PersistConfig::default());
    let page = signup_page();
    let submission: FormSubmission = [("email", "")].into_iter().collect();
    assert!(!page.form.process_submission(&submission));

    let tracker = page.form.tracker();
    assert_eq!(
        store.store("signup", &*tracker.borrow()).unwrap(),
        StoreOutcome::Stored
    );
    assert!(!tracker.borrow().is_dirty());
    assert_eq!(
        store.store("signup", &*tracker.borrow()).unwrap(),
        StoreOutcome::SkippedClean
    );

    let mut next_request = signup_page();
    next_request
        .form
        .replace_tracker(store.load_or_default("signup").unwrap());
    let html = render(&mut next_request.tree);
    assert!(html.contains("<li>You must provide a value for Email.</li>"));
    assert!(html.contains("<label for=\"email\" class=\"error\">"));
}

#[test]
fn form_level_checks_add_unassociated_errors() {
    let page = signup_page();
    page.form.on_validate(|_| {
        Err(forms::UnassociatedError("Registration is closed.".into()))
    });
    let submission: FormSubmission = [("email", "ada@example.com")].into_iter().collect();
    assert!(!page.form.process_submission(&submission));
    assert_eq!(
        page.form.tracker().borrow().unassociated_errors(),
        &["Registration is closed.".to_string()]
    );
}

fn results_zone(items: Vec<&'static str>) -> (RenderTree, render::ComponentKey) {
    let mut tree = RenderTree::new("page", Page::new("Search")).unwrap();
    let zone = tree
        .add_child(tree.root(), "results", Zone::new("results"))
        .unwrap();
    let current: Binding<String> = Binding::empty();
    let source = move || items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let rows = tree
        .add_child(zone, "rows", Loop::new(source, current.clone()))
        .unwrap();
    tree.add_child(
        rows,
        "row",
        Output::wrapped("li", move || current.get().unwrap_or_default()),
    )
    .unwrap();
    (tree, zone)
}

#[test]
fn loop_renders_one_row_per_item() {
    let (mut tree, _) = results_zone(vec!["alpha", "beta", "gamma"]);
    let html = render(&mut tree);
    assert!(html.contains(
        "<div id=\"results\" class=\"t-zone\"><li>alpha</li><li>beta</li><li>gamma</li></div>"
    ));
}

#[test]
fn empty_loop_renders_nothing() {
    let (mut tree, _) = results_zone(Vec::new());
    let html = render(&mut tree);
    assert!(html.contains("<div id=\"results\" class=\"t-zone\"></div>"));
}

#[test]
fn zone_update_carries_only_the_zone_content() {
    let (mut tree, zone) = results_zone(vec!["a & b"]);
    let update = Scheduler::default()
        .render_partial(
            &mut tree,
            zone,
            "results",
            MarkupTree::new(MarkupConfig::default()),
        )
        .unwrap();
    assert_eq!(
        update.to_json().unwrap(),
        r#"{"zones":{"results":"<li>a &amp; b</li>"}}"#
    );
}

#[test]
fn zone_id_is_not_reused_by_later_client_ids() {
    let (mut tree, _) = results_zone(vec!["alpha"]);
    let form = Form::new("results", "/search", FormsConfig::default());
    tree.add_child(tree.root(), "filter", form).unwrap();
    let html = render(&mut tree);
    assert!(html.contains("<div id=\"results\" class=\"t-zone\">"));
    assert!(html.contains("<form method=\"post\" action=\"/search\" id=\"results_0\">"));
}
