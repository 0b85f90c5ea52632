use core_types::Asset;
use render::{PhaseHandler, PhaseOutcome, PhaseResult, RenderContext};

/// Root component: writes the HTML document skeleton and renders its body inside `<body>`.
/// Stylesheets imported anywhere on the page end up in `<head>`.
#[derive(Debug)]
pub struct Page {
    title: String,
    stylesheets: Vec<Box<dyn Asset>>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            stylesheets: Vec::new(),
        }
    }

    pub fn with_stylesheet(mut self, asset: impl Asset + 'static) -> Self {
        self.stylesheets.push(Box::new(asset));
        self
    }
}

impl PhaseHandler for Page {
    fn setup_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        for asset in &self.stylesheets {
            cx.import_stylesheet(asset.as_ref());
        }
        Ok(PhaseOutcome::Continue)
    }

    fn begin_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let markup = cx.markup();
        markup.set_doctype("html");
        markup.open_element("html", &[]);
        markup.open_element("head", &[]);
        markup.open_element("title", &[]);
        markup.write_text(&self.title);
        markup.close_element()?;
        markup.close_element()?;
        markup.open_element("body", &[]);
        Ok(PhaseOutcome::Continue)
    }

    fn after_render(&mut self, cx: &mut RenderContext<'_>) -> PhaseResult {
        let markup = cx.markup();
        markup.close_element()?;
        markup.close_element()?;
        Ok(PhaseOutcome::Continue)
    }
}
