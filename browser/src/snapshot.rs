use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use crate::{
    errors::BrowserError,
    traits::Browser,
};

static ALL_ELEMENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("universal selector is valid CSS"));

const ROOT_PATH: &str = "/";

/// Something a page object did to a [`SnapshotBrowser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Click(String),
    Fill(String, String),
    Check(String, bool),
    Select(String, String),
}

/// Handle to an element of the current snapshot, by document position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotElement {
    index: usize,
}

#[derive(Default)]
struct SnapshotState {
    source: String,
    values: HashMap<usize, String>,
    checked: HashMap<usize, bool>,
    actions: Vec<Action>,
}

/// Static-DOM browser over saved HTML pages, keyed by URL path.
///
/// Nothing is executed: clicks only toggle checkboxes and radios, fills and
/// selects only change what `input_value` reports. Every interaction is kept
/// in an action log so page-object flows can be asserted without a browser.
#[derive(Default)]
pub struct SnapshotBrowser {
    pages: HashMap<String, String>,
    state: Mutex<SnapshotState>,
}

fn lock(state: &Mutex<SnapshotState>) -> MutexGuard<'_, SnapshotState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|_| BrowserError::InvalidSelector(selector.into()))
}

fn url_to_path(url: &str) -> Result<String, BrowserError> {
    if url.starts_with('/') {
        return Ok(url.split(['?', '#']).next().unwrap_or(ROOT_PATH).into());
    }

    let Ok(parsed) = Url::parse(url) else {
        return Err(BrowserError::InvalidUrl(url.into()));
    };

    Ok(parsed.path().into())
}

fn position_of(html: &Html, element: ElementRef) -> usize {
    html.select(&ALL_ELEMENTS)
        .position(|candidate| candidate.id() == element.id())
        .unwrap_or_default()
}

fn resolve(html: &Html, handle: SnapshotElement) -> Option<ElementRef<'_>> {
    html.select(&ALL_ELEMENTS).nth(handle.index)
}

fn is_rendered(element: ElementRef) -> bool {
    let hides = |candidate: ElementRef| {
        let value = candidate.value();
        let hidden_style = value
            .attr("style")
            .map(|style| style.replace(' ', "").contains("display:none"))
            .unwrap_or(false);

        value.attr("hidden").is_some()
            || hidden_style
            || (value.name() == "input" && value.attr("type") == Some("hidden"))
    };

    if hides(element) {
        return false;
    }

    !element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(hides)
}

fn describe(element: ElementRef) -> String {
    let value = element.value();

    if let Some(id) = value.id() {
        return format!("#{id}");
    }

    if let Some(name) = value.attr("name") {
        return format!("{}[name=\"{name}\"]", value.name());
    }

    match value.classes().next() {
        Some(class) => format!("{}.{class}", value.name()),
        None => value.name().into(),
    }
}

fn is_toggle(element: ElementRef) -> bool {
    let value = element.value();

    value.name() == "input" && matches!(value.attr("type"), Some("checkbox") | Some("radio"))
}

impl SnapshotBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A browser that is already showing `html`
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let browser = Self::new().with_page(ROOT_PATH, html.clone());

        lock(&browser.state).source = html;

        browser
    }

    pub fn with_page(mut self, path: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(path.into(), html.into());

        self
    }

    pub fn actions(&self) -> Vec<Action> {
        lock(&self.state).actions.clone()
    }

    pub fn is_checked(&self, selector: &str) -> Result<bool, BrowserError> {
        let selector_query = parse_selector(selector)?;
        let state = lock(&self.state);
        let html = Html::parse_document(&state.source);

        let Some(element) = html.select(&selector_query).next() else {
            return Err(BrowserError::ElementNotFound(selector.into()));
        };

        let index = position_of(&html, element);

        Ok(state
            .checked
            .get(&index)
            .copied()
            .unwrap_or(element.value().attr("checked").is_some()))
    }

    fn first_match(&self, selector: &str) -> Result<Option<SnapshotElement>, BrowserError> {
        let selector_query = parse_selector(selector)?;
        let html = Html::parse_document(&lock(&self.state).source);

        Ok(html
            .select(&selector_query)
            .next()
            .map(|element| SnapshotElement {
                index: position_of(&html, element),
            }))
    }

    fn required_match(&self, selector: &str) -> Result<SnapshotElement, BrowserError> {
        self.first_match(selector)?
            .ok_or_else(|| BrowserError::ElementNotFound(selector.into()))
    }

    fn matches_within(
        &self,
        parent: SnapshotElement,
        selector: &str,
    ) -> Result<Vec<SnapshotElement>, BrowserError> {
        let selector_query = parse_selector(selector)?;
        let html = Html::parse_document(&lock(&self.state).source);

        let Some(parent) = resolve(&html, parent) else {
            return Ok(Vec::new());
        };

        Ok(parent
            .select(&selector_query)
            .map(|element| SnapshotElement {
                index: position_of(&html, element),
            })
            .collect())
    }

    fn describe_handle(&self, handle: SnapshotElement) -> String {
        let html = Html::parse_document(&lock(&self.state).source);

        resolve(&html, handle)
            .map(describe)
            .unwrap_or_else(|| format!("element {}", handle.index))
    }

    fn toggle(&self, handle: SnapshotElement, checked: bool) {
        let mut state = lock(&self.state);
        let html = Html::parse_document(&state.source);

        let Some(element) = resolve(&html, handle) else {
            return;
        };

        // radios in the same group are mutually exclusive
        if checked && element.value().attr("type") == Some("radio") {
            if let Some(group) = element.value().attr("name") {
                for sibling in html.select(&ALL_ELEMENTS) {
                    if sibling.value().attr("name") == Some(group) && sibling.id() != element.id()
                    {
                        state.checked.insert(position_of(&html, sibling), false);
                    }
                }
            }
        }

        state.checked.insert(handle.index, checked);
    }

    fn checked_state(&self, handle: SnapshotElement) -> bool {
        let state = lock(&self.state);
        let html = Html::parse_document(&state.source);

        state.checked.get(&handle.index).copied().unwrap_or_else(|| {
            resolve(&html, handle)
                .map(|element| element.value().attr("checked").is_some())
                .unwrap_or(false)
        })
    }

    fn record(&self, action: Action) {
        trace!("{action:?}");

        lock(&self.state).actions.push(action);
    }

    fn click_handle(&self, handle: SnapshotElement, label: String) {
        let toggles = {
            let html = Html::parse_document(&lock(&self.state).source);
            resolve(&html, handle).map(is_toggle).unwrap_or(false)
        };

        if toggles {
            let is_radio = {
                let html = Html::parse_document(&lock(&self.state).source);
                resolve(&html, handle)
                    .map(|element| element.value().attr("type") == Some("radio"))
                    .unwrap_or(false)
            };

            let next = is_radio || !self.checked_state(handle);
            self.toggle(handle, next);
        }

        self.record(Action::Click(label));
    }
}

#[async_trait]
impl Browser for SnapshotBrowser {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let path = url_to_path(url)?;

        let Some(page) = self.pages.get(&path) else {
            return Err(BrowserError::UnknownPage(path));
        };

        debug!("Loading snapshot for {path}");

        {
            let mut state = lock(&self.state);
            state.source = page.clone();
            state.values.clear();
            state.checked.clear();
        }

        self.record(Action::Navigate(url.into()));

        Ok(())
    }

    async fn wait_for_network_idle(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn title(&self) -> Result<String, BrowserError> {
        Ok(self
            .text_of("title")
            .await?
            .map(|title| title.trim().to_string())
            .unwrap_or_default())
    }

    async fn query(&self, selector: &str) -> Result<Option<SnapshotElement>, BrowserError> {
        self.first_match(selector)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<SnapshotElement>, BrowserError> {
        let selector_query = parse_selector(selector)?;
        let html = Html::parse_document(&lock(&self.state).source);

        Ok(html
            .select(&selector_query)
            .map(|element| SnapshotElement {
                index: position_of(&html, element),
            })
            .collect())
    }

    async fn query_within(
        &self,
        parent: &SnapshotElement,
        selector: &str,
    ) -> Result<Option<SnapshotElement>, BrowserError> {
        Ok(self.matches_within(*parent, selector)?.into_iter().next())
    }

    async fn query_all_within(
        &self,
        parent: &SnapshotElement,
        selector: &str,
    ) -> Result<Vec<SnapshotElement>, BrowserError> {
        self.matches_within(*parent, selector)
    }

    async fn text_content(
        &self,
        element: &SnapshotElement,
    ) -> Result<Option<String>, BrowserError> {
        let html = Html::parse_document(&lock(&self.state).source);

        Ok(resolve(&html, *element).map(|element| element.text().collect::<String>()))
    }

    async fn input_value(&self, element: &SnapshotElement) -> Result<String, BrowserError> {
        let state = lock(&self.state);

        if let Some(value) = state.values.get(&element.index) {
            return Ok(value.clone());
        }

        let html = Html::parse_document(&state.source);

        let Some(element) = resolve(&html, *element) else {
            return Ok(String::new());
        };

        let value = match element.value().name() {
            "textarea" => element.text().collect::<String>(),
            "select" => {
                let options = parse_selector("option")?;
                let mut choices = element.select(&options);
                let selected = element
                    .select(&options)
                    .find(|option| option.value().attr("selected").is_some())
                    .or_else(|| choices.next());

                selected
                    .map(|option| {
                        option
                            .value()
                            .attr("value")
                            .map(str::to_string)
                            .unwrap_or_else(|| option.text().collect::<String>())
                    })
                    .unwrap_or_default()
            }
            _ => element.value().attr("value").unwrap_or_default().to_string(),
        };

        Ok(value)
    }

    async fn attribute(
        &self,
        element: &SnapshotElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let html = Html::parse_document(&lock(&self.state).source);

        Ok(resolve(&html, *element).and_then(|element| element.value().attr(name).map(Into::into)))
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, BrowserError> {
        let selector_query = parse_selector(selector)?;
        let html = Html::parse_document(&lock(&self.state).source);

        Ok(html.select(&selector_query).next().is_some_and(is_rendered))
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        // a static page never changes, so the first answer is final
        if self.is_visible(selector).await? {
            return Ok(());
        }

        Err(BrowserError::Timeout(selector.into(), timeout))
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let handle = self.required_match(selector)?;
        self.click_handle(handle, selector.into());

        Ok(())
    }

    async fn click_element(&self, element: &SnapshotElement) -> Result<(), BrowserError> {
        let label = self.describe_handle(*element);
        self.click_handle(*element, label);

        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let handle = self.required_match(selector)?;

        lock(&self.state).values.insert(handle.index, value.into());
        self.record(Action::Fill(selector.into(), value.into()));

        Ok(())
    }

    async fn fill_element(
        &self,
        element: &SnapshotElement,
        value: &str,
    ) -> Result<(), BrowserError> {
        let label = self.describe_handle(*element);

        lock(&self.state).values.insert(element.index, value.into());
        self.record(Action::Fill(label, value.into()));

        Ok(())
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<(), BrowserError> {
        let handle = self.required_match(selector)?;

        self.toggle(handle, checked);
        self.record(Action::Check(selector.into(), checked));

        Ok(())
    }

    async fn set_element_checked(
        &self,
        element: &SnapshotElement,
        checked: bool,
    ) -> Result<(), BrowserError> {
        let label = self.describe_handle(*element);

        self.toggle(*element, checked);
        self.record(Action::Check(label, checked));

        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let handle = self.required_match(selector)?;
        let options = self.matches_within(handle, "option")?;

        let mut chosen = None;

        for option in options {
            let option_value = self
                .attribute(&option, "value")
                .await?
                .unwrap_or_default();
            let label = self
                .text_content(&option)
                .await?
                .unwrap_or_default()
                .trim()
                .to_string();

            if option_value == value || label == value {
                chosen = Some(option_value);
                break;
            }
        }

        let Some(chosen) = chosen else {
            return Err(BrowserError::MissingOption(selector.into(), value.into()));
        };

        lock(&self.state).values.insert(handle.index, chosen);
        self.record(Action::Select(selector.into(), value.into()));

        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        Ok(lock(&self.state).source.clone().into_bytes())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn wait_for_any_selector(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<usize, BrowserError> {
        for (index, selector) in selectors.iter().enumerate() {
            if self.is_visible(selector).await? {
                return Ok(index);
            }
        }

        Err(BrowserError::Timeout(selectors.join(" | "), timeout))
    }

    async fn pause(&self, _duration: Duration) {}
}
