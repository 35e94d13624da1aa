pub(crate) const SITE_CONFIG_GLOBAL: &str = "__PORTFOLIO_SITE_CONFIG__";
pub(crate) const NAVBAR_ID: &str = "mainNav";
pub(crate) const THEME_TOGGLE_ID: &str = "themeToggle";
pub(crate) const SCROLL_TO_TOP_ID: &str = "scrollToTop";
pub(crate) const READING_PROGRESS_ID: &str = "readingProgress";
pub(crate) const PRELOADER_ID: &str = "preloader";
pub(crate) const CONTACT_FORM_ID: &str = "contactForm";
pub(crate) const NEWSLETTER_FORM_ID: &str = "newsletterForm";
pub(crate) const NOTIFICATION_ROOT_ID: &str = "notificationRoot";
pub(crate) const SEARCH_INPUT_ID: &str = "searchInput";
pub(crate) const SEARCH_RESULTS_ID: &str = "searchResults";

pub(crate) const NAVBAR_COLLAPSE_SELECTOR: &str = ".navbar-collapse";
pub(crate) const NAV_LINK_SELECTOR: &str = ".navbar-nav .nav-link";
pub(crate) const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub(crate) const SUBMIT_CONTROL_SELECTOR: &str = "button[type=\"submit\"]";
pub(crate) const VALIDATED_FORM_SELECTOR: &str = "form.needs-validation";
pub(crate) const SKILL_BAR_SELECTOR: &str = ".skill-progress";
pub(crate) const COUNTER_SELECTOR: &str = ".counter";
pub(crate) const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
pub(crate) const PARALLAX_SELECTOR: &str = ".parallax";
pub(crate) const PROJECT_FILTER_SELECTOR: &str = ".project-filter";
pub(crate) const PROJECT_CARD_SELECTOR: &str = ".project-card";
pub(crate) const COPY_BUTTON_SELECTOR: &str = ".copy-btn";
pub(crate) const NOTIFICATION_SELECTOR: &str = ".notification";

pub(crate) const SCROLLED_CLASS: &str = "scrolled";
pub(crate) const VISIBLE_CLASS: &str = "visible";
pub(crate) const SHOW_CLASS: &str = "show";
pub(crate) const ACTIVE_CLASS: &str = "active";
pub(crate) const FADE_IN_CLASS: &str = "fade-in";
pub(crate) const FADE_OUT_CLASS: &str = "fade-out";
pub(crate) const WAS_VALIDATED_CLASS: &str = "was-validated";

pub(crate) const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub(crate) const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub(crate) const COPIED_LABEL_HTML: &str = "<i class=\"fas fa-check\"></i> Copied!";
pub(crate) const COPY_FAILED_MESSAGE: &str = "Failed to copy text";
