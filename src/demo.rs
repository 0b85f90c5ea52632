//! Demo pages driven by the binary: a sign-up form and a search result zone.

use std::sync::Arc;

use components::{Binding, Errors, Form, Label, Loop, Output, Page, TextField, Zone};
use core_types::{Messages, StaticAsset};
use forms::{
    FieldInfo, FieldTranslationPipeline, FormsConfig, IntegerTranslator, Min, MinLength,
    Required, StringTranslator,
};
use render::{ComponentKey, RenderError, RenderTree};

use crate::config::AppConfig;

pub struct SignupPage {
    pub tree: RenderTree,
    pub form: Form,
    pub email: Binding<String>,
    pub age: Binding<i64>,
}

pub fn signup_page(
    config: &AppConfig,
    messages: &Arc<dyn Messages>,
) -> Result<SignupPage, RenderError> {
    let mut page = Page::new(config.demo.title.as_str());
    for href in &config.demo.stylesheets {
        page = page.with_stylesheet(StaticAsset::stylesheet(href.as_str(), true));
    }
    let mut tree = RenderTree::new("signup", page)?;
    let forms_config: FormsConfig = config.forms_config();
    let error_class = forms_config.error_class.clone();
    let form = Form::new("signup", "/signup", forms_config);
    let form_key = tree.add_child(tree.root(), "form", form.clone())?;
    tree.add_child(
        form_key,
        "errors",
        Errors::new(form.tracker(), "Please correct the following:"),
    )?;

    let email = Binding::empty();
    let email_field = TextField::new(
        &form,
        FieldInfo::new("email", "Email"),
        FieldTranslationPipeline::new(StringTranslator, Arc::clone(messages))
            .with_validator(Required)
            .with_validator(MinLength(5)),
        email.clone(),
    );
    tree.add_child(
        form_key,
        "emailLabel",
        Label::new(email_field.handle(), form.tracker(), error_class.as_str()),
    )?;
    tree.add_child(form_key, "email", email_field)?;

    let age = Binding::empty();
    let age_field = TextField::new(
        &form,
        FieldInfo::new("age", "Age"),
        FieldTranslationPipeline::new(IntegerTranslator, Arc::clone(messages))
            .with_validator(Min(13)),
        age.clone(),
    );
    tree.add_child(
        form_key,
        "ageLabel",
        Label::new(age_field.handle(), form.tracker(), error_class.as_str()),
    )?;
    tree.add_child(form_key, "age", age_field)?;

    Ok(SignupPage {
        tree,
        form,
        email,
        age,
    })
}

/// Page with a `results` zone listing `config.demo.results`. Returns the tree and the zone.
pub fn results_page(config: &AppConfig) -> Result<(RenderTree, ComponentKey), RenderError> {
    let mut tree = RenderTree::new("search", Page::new("Search"))?;
    let zone = tree.add_child(tree.root(), "results", Zone::new("results"))?;
    let list = tree.add_child(zone, "list", ListElement)?;
    let items = config.demo.results.clone();
    let current: Binding<String> = Binding::empty();
    let rows = tree.add_child(list, "rows", Loop::new(move || items.clone(), current.clone()))?;
    tree.add_child(
        rows,
        "row",
        Output::wrapped("li", move || current.get().unwrap_or_default()),
    )?;
    Ok((tree, zone))
}

/// `<ul>` around its body.
struct ListElement;

impl render::PhaseHandler for ListElement {
    fn begin_render(&mut self, cx: &mut render::RenderContext<'_>) -> render::PhaseResult {
        cx.markup().open_element("ul", &[]);
        Ok(render::PhaseOutcome::Continue)
    }

    fn after_render(&mut self, cx: &mut render::RenderContext<'_>) -> render::PhaseResult {
        cx.markup().close_element()?;
        Ok(render::PhaseOutcome::Continue)
    }
}
