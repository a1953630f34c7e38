//! Terminal session: loaded content, the output surface and page navigation.
//!
//! A session owns its document, print queue and cancellation token, so
//! several sessions can coexist in one process.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::actions::{ActionContext, ActionRegistry};
use crate::content::{reference, ContentItem, ContentSet, NavDirection, PageRef, HOME_PAGE};
use crate::document::{Document, Interaction, NodeId, Surface, Tag};
use crate::opener::{LinkOpener, SystemOpener};
use crate::print::{
    CancellationToken, FsImageLoader, ImageLoader, ImageRevealer, RevealTiming, Sequencer,
    Typewriter,
};
use crate::render::ContentRenderer;

/// Printed when the content file cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Error: Failed to load content. Please check the log for details.";

/// Label of the link appended to every page except the home page.
pub const BACK_LINK_LABEL: &str = "Restart program";

/// Default element id of the output container.
pub const DEFAULT_CONTAINER_ID: &str = "terminal";

/// Session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Id of the element output goes into
    pub container_id: String,
    /// Entry page, exempt from the back link
    pub home_page: String,
    /// Delay between typed characters
    pub print_interval: Duration,
    pub reveal: RevealTiming,
    /// Seed for image stalls, random when unset
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            home_page: HOME_PAGE.to_string(),
            print_interval: Typewriter::DEFAULT_INTERVAL,
            reveal: RevealTiming::default(),
            seed: None,
        }
    }
}

/// Navigator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    /// Clearing the previous page
    Navigating,
    /// Queuing the new page
    Rendering,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Nothing to do: no reference, or no content loaded
    Ignored,
    /// External URL handed to the opener
    Opened(String),
    /// Page cleared and rendering
    Rendered(String),
    /// Unknown page id, error printed
    NotFound(String),
}

/// Result of activating a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Node has no interaction or is gone
    Inert,
    Navigated(NavigationOutcome),
    RanAction(String),
    ActionUnavailable(String),
    ActionFailed(String),
}

/// One running terminal site.
pub struct TerminalSession {
    options: SessionOptions,
    surface: Surface,
    sequencer: Sequencer,
    typewriter: Typewriter,
    revealer: Arc<ImageRevealer>,
    custom_loader: bool,
    content: Option<ContentSet>,
    current_page: Option<String>,
    state: NavState,
    cancel: CancellationToken,
    opener: Arc<dyn LinkOpener>,
    actions: ActionRegistry,
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("options", &self.options)
            .field("current_page", &self.current_page)
            .field("state", &self.state)
            .field("pending", &self.sequencer.pending())
            .finish()
    }
}

impl TerminalSession {
    /// A session with an empty document holding only the output container.
    pub fn new(options: SessionOptions) -> Self {
        let surface = Surface::new(Document::with_container(&options.container_id), &options.container_id);
        Self::with_surface(options, surface)
    }

    /// A session printing into an existing surface.
    pub fn with_surface(options: SessionOptions, surface: Surface) -> Self {
        let loader: Arc<dyn ImageLoader> = Arc::new(FsImageLoader::new(None));
        let revealer = Arc::new(ImageRevealer::new(loader, options.reveal, options.seed));
        Self {
            typewriter: Typewriter::new(options.print_interval),
            options,
            surface,
            sequencer: Sequencer::new(),
            revealer,
            custom_loader: false,
            content: None,
            current_page: None,
            state: NavState::Idle,
            cancel: CancellationToken::new(),
            opener: Arc::new(SystemOpener::new()),
            actions: ActionRegistry::with_builtins(),
        }
    }

    pub fn with_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Use `loader` for images instead of reading files next to the content.
    pub fn with_image_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.revealer = Arc::new(ImageRevealer::new(loader, self.options.reveal, self.options.seed));
        self.custom_loader = true;
        self
    }

    /// Read and parse the content file.
    ///
    /// On failure the error is logged, a notice is printed and nothing else
    /// happens. Returns whether content is loaded.
    pub async fn load_content(&mut self, path: &Path) -> bool {
        match ContentSet::load(path).await {
            Ok(content) => {
                info!(path = %path.display(), pages = content.len(), "content loaded");
                self.set_content(content);
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load content");
                self.print_error(LOAD_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Use already parsed content.
    pub fn set_content(&mut self, content: ContentSet) {
        if !self.custom_loader {
            let loader: Arc<dyn ImageLoader> = Arc::new(FsImageLoader::new(content.base_dir()));
            self.revealer = Arc::new(ImageRevealer::new(loader, self.options.reveal, self.options.seed));
        }
        self.content = Some(content);
    }

    /// Go to the home page.
    pub fn open_home(&mut self) -> NavigationOutcome {
        let home = reference::internal(&self.options.home_page);
        self.navigate(Some(&home))
    }

    /// Follow a page reference or external URL.
    pub fn navigate(&mut self, target: Option<&str>) -> NavigationOutcome {
        let Some(page_ref) = target.and_then(PageRef::parse) else {
            return NavigationOutcome::Ignored;
        };

        let id = match page_ref {
            PageRef::External(url) => {
                info!(url, "opening external link");
                if let Err(e) = self.opener.open(url) {
                    warn!(url, error = %e, "failed to open external link");
                }
                return NavigationOutcome::Opened(url.to_string());
            }
            PageRef::Internal(id) => id,
        };

        let Some(content) = &self.content else {
            warn!(page = id, "navigation before content was loaded");
            return NavigationOutcome::Ignored;
        };
        let Some(page) = content.page(id).cloned() else {
            warn!(page = id, "page not found");
            self.print_error(&format!("Error: page '{}' not found.", id));
            return NavigationOutcome::NotFound(id.to_string());
        };

        debug!(page = id, "navigating");
        self.set_state(NavState::Navigating);
        self.discard_output();

        self.set_state(NavState::Rendering);
        let renderer = self.renderer();
        renderer.render_title(&page.title);
        for item in &page.content {
            renderer.render_item(item);
        }
        if id != self.options.home_page {
            renderer.render_item(&back_link(&self.options.home_page));
        }
        self.current_page = Some(id.to_string());
        self.sequencer.start();
        self.set_state(NavState::Idle);

        NavigationOutcome::Rendered(id.to_string())
    }

    /// Print a line of text below the current output.
    pub fn print(&self, message: &str) {
        self.print_with_class("terminal-text", message);
    }

    /// Print an error line below the current output.
    pub fn print_error(&self, message: &str) {
        self.print_with_class("terminal-text error-text", message);
    }

    fn print_with_class(&self, class: &str, message: &str) {
        self.renderer().render_paragraph(class, message);
        self.sequencer.start();
    }

    /// Remove all output and stop pending reveals.
    pub fn clear(&mut self) {
        self.discard_output();
    }

    /// Run whatever `node` does when clicked.
    pub fn activate(&mut self, node: NodeId) -> Activation {
        let interaction = self.surface.read(|doc| {
            if !doc.is_attached(node) {
                return None;
            }
            doc.get(node).and_then(|el| el.interaction.clone())
        });

        match interaction {
            None => Activation::Inert,
            Some(Interaction::Navigate(target)) => Activation::Navigated(self.navigate(Some(&target))),
            Some(Interaction::Action(name)) => self.run_action(&name, node),
        }
    }

    fn run_action(&mut self, name: &str, trigger: NodeId) -> Activation {
        let Some(action) = self.actions.get(name) else {
            warn!(action = name, "unknown action");
            self.print_error(&format!("Error: action '{}' is not available.", name));
            return Activation::ActionUnavailable(name.to_string());
        };

        debug!(action = name, "running action");
        let mut ctx = ActionContext {
            session: &mut *self,
            trigger,
        };
        match action(&mut ctx) {
            Ok(()) => Activation::RanAction(name.to_string()),
            Err(e) => {
                warn!(action = name, error = %e, "action failed");
                self.print_error(&format!("Error: {}", e));
                Activation::ActionFailed(name.to_string())
            }
        }
    }

    /// Value of the input with element id `id`.
    pub fn input_value(&self, id: &str) -> Option<String> {
        self.surface.read(|doc| {
            let node = doc.find_by_id(id)?;
            let el = doc.get(node)?;
            (el.tag == Tag::Input).then(|| el.value.clone())
        })
    }

    /// Replace the value of an input node. False if `node` is not an input.
    pub fn set_input_value(&self, node: NodeId, value: &str) -> bool {
        self.surface.write(|doc| doc.set_value(node, value))
    }

    /// Id and value of every visible input, in document order.
    pub fn input_values(&self) -> Vec<(String, String)> {
        let container = self.surface.container();
        self.surface.read(|doc| {
            doc.descendants(container)
                .into_iter()
                .filter_map(|node| doc.get(node))
                .filter(|el| el.tag == Tag::Input)
                .map(|el| (el.id.clone().unwrap_or_default(), el.value.clone()))
                .collect()
        })
    }

    /// Visible nodes that can take focus, in document order.
    pub fn interactive_nodes(&self) -> Vec<NodeId> {
        let container = self.surface.container();
        self.surface.read(|doc| doc.interactive_nodes(container))
    }

    /// Wait until every queued reveal has finished.
    pub async fn wait_idle(&self) {
        self.sequencer.wait_idle().await;
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    pub fn home_page(&self) -> &str {
        &self.options.home_page
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn content(&self) -> Option<&ContentSet> {
        self.content.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    fn renderer(&self) -> ContentRenderer {
        ContentRenderer::new(
            self.surface.clone(),
            self.sequencer.clone(),
            self.typewriter,
            self.revealer.clone(),
            self.cancel.clone(),
        )
    }

    /// Stop the current render and empty the surface.
    fn discard_output(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        let discarded = self.sequencer.reset();
        self.surface.clear();
        trace!(discarded, "output discarded");
    }

    fn set_state(&mut self, state: NavState) {
        trace!(from = ?self.state, to = ?state, "navigator state");
        self.state = state;
    }
}

/// The link appended to every page except the home page.
pub fn back_link(home_page: &str) -> ContentItem {
    ContentItem::link(BACK_LINK_LABEL, reference::internal(home_page), NavDirection::Back)
}
