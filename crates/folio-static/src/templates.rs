//! Template engine for rendering documentation pages.

use minijinja::{context, Environment};
use serde::Serialize;

use folio_config::{Footer, Labels, SearchTranslations, SocialLink};
use folio_markdown::TocEntry;

use crate::nav::{NavItem, PageLink, SidebarGroup};

/// Site-wide values, built once per build.
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub description: String,
    pub lang: String,
    /// Home href (the base path)
    pub home: String,
    /// Logo href
    pub logo: Option<String>,
    /// Pre-rendered extra `<head>` elements
    pub head: String,
    pub social_links: Vec<SocialLink>,
    pub footer: Option<Footer>,
    pub labels: Labels,
    pub search: Option<SearchView>,
    /// Text of the edit link, when edit links are configured
    pub edit_text: Option<String>,
    pub stylesheet: String,
    pub script: String,
    /// Dev server reload script
    pub live_reload: Option<String>,
}

/// Local search widget settings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub index_url: String,
    pub translations: SearchTranslations,
    /// Translations as JSON for the client script
    pub translations_json: String,
}

/// Values for one page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub title: String,
    /// Value of `<title>`
    pub head_title: String,
    pub description: String,
    pub route: String,
    /// Rendered document HTML
    pub content: String,
    /// Theme slot fragments
    pub doc_before: String,
    pub doc_after: String,
    pub layout_bottom: String,
    pub nav: Vec<NavItem>,
    pub sidebar: Vec<SidebarGroup>,
    pub outline: Vec<TocEntry>,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
    pub edit_url: Option<String>,
    /// RFC 3339 modification time
    pub last_updated: Option<String>,
    pub not_found: bool,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("doc.html".to_string(), DOC_TEMPLATE.to_string())
            .expect("Failed to add doc template");

        env.add_template_owned("navbar.html".to_string(), NAVBAR_TEMPLATE.to_string())
            .expect("Failed to add navbar template");

        env.add_template_owned("sidebar.html".to_string(), SIDEBAR_TEMPLATE.to_string())
            .expect("Failed to add sidebar template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        site: &SiteView,
        page: &PageView,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            site => site,
            page => page,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ site.lang }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page.head_title }}</title>
  <meta name="description" content="{{ page.description or site.description }}">
  {{ site.head | safe }}
  <link rel="stylesheet" href="{{ site.stylesheet }}">
  <script>document.documentElement.classList.toggle('dark', localStorage.getItem('folio-appearance') === 'dark' || (!localStorage.getItem('folio-appearance') && matchMedia('(prefers-color-scheme: dark)').matches))</script>
</head>
<body>
  {% include "navbar.html" %}
  <div class="local-nav">
    <button type="button" class="menu-btn" aria-controls="sidebar">{{ site.labels.sidebar_menu }}</button>
    <a class="return-to-top" href="#">{{ site.labels.return_to_top }}</a>
  </div>
  <div class="layout{% if not page.sidebar %} no-sidebar{% endif %}">
    {% if page.sidebar %}
    <aside class="sidebar" id="sidebar">
      {% include "sidebar.html" %}
    </aside>
    {% endif %}
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  {% if site.footer %}
  <footer class="site-footer">
    {% if site.footer.message %}<p class="footer-message">{{ site.footer.message }}</p>{% endif %}
    {% if site.footer.copyright %}<p class="footer-copyright">{{ site.footer.copyright }}</p>{% endif %}
  </footer>
  {% endif %}
  {{ page.layout_bottom | safe }}
  {% if site.search %}
  <div class="search-modal" hidden>
    <div class="search-panel" role="dialog" aria-label="{{ site.search.translations.button.button_aria_label }}">
      <div class="search-bar">
        <input class="search-input" type="search" aria-label="{{ site.search.translations.button.button_aria_label }}">
        <button type="button" class="search-reset" title="{{ site.search.translations.modal.reset_button_title }}">&times;</button>
      </div>
      <ul class="search-results"></ul>
      <div class="search-footer">
        <span><kbd>&crarr;</kbd> {{ site.search.translations.modal.footer.select_text }}</span>
        <span><kbd>&uarr;</kbd><kbd>&darr;</kbd> {{ site.search.translations.modal.footer.navigate_text }}</span>
        <span><kbd>esc</kbd> {{ site.search.translations.modal.footer.close_text }}</span>
      </div>
    </div>
  </div>
  <script id="search-config" type="application/json" data-index="{{ site.search.index_url }}">{{ site.search.translations_json | safe }}</script>
  {% endif %}
  <script src="{{ site.script }}" defer></script>
  {% if site.live_reload %}<script src="{{ site.live_reload }}"></script>{% endif %}
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="doc-container">
  <article class="doc">
    {{ page.doc_before | safe }}
    <div class="content">
      {{ page.content | safe }}
    </div>
    {{ page.doc_after | safe }}
    {% if not page.not_found %}
    <footer class="doc-footer">
      {% if page.edit_url or page.last_updated %}
      <div class="doc-meta">
        {% if page.edit_url %}<a class="edit-link" href="{{ page.edit_url }}" target="_blank" rel="noreferrer">{{ site.edit_text }}</a>{% endif %}
        {% if page.last_updated %}<p class="last-updated">{{ site.labels.last_updated }}: <time datetime="{{ page.last_updated }}">{{ page.last_updated }}</time></p>{% endif %}
      </div>
      {% endif %}
      {% if page.prev or page.next %}
      <nav class="prev-next">
        {% if page.prev %}<a class="pager prev" href="{{ page.prev.href }}"><span class="desc">{{ site.labels.prev }}</span><span class="title">{{ page.prev.text }}</span></a>{% endif %}
        {% if page.next %}<a class="pager next" href="{{ page.next.href }}"><span class="desc">{{ site.labels.next }}</span><span class="title">{{ page.next.text }}</span></a>{% endif %}
      </nav>
      {% endif %}
    </footer>
    {% endif %}
  </article>

  {% if page.outline %}
  <aside class="outline">
    <h2>{{ site.labels.outline }}</h2>
    <ul>
    {% for entry in page.outline %}
      <li class="outline-level-{{ entry.level }}">
        <a href="#{{ entry.id }}">{{ entry.title }}</a>
      </li>
    {% endfor %}
    </ul>
  </aside>
  {% endif %}
</div>
{% endblock %}"##;

const NAVBAR_TEMPLATE: &str = r##"<header class="navbar">
  <a href="{{ site.home }}" class="nav-title">
    {% if site.logo %}<img class="logo" src="{{ site.logo }}" alt="">{% endif %}
    <span>{{ site.title }}</span>
  </a>
  {% if site.search %}
  <button type="button" class="search-btn" aria-label="{{ site.search.translations.button.button_aria_label }}">{{ site.search.translations.button.button_text }}</button>
  {% endif %}
  <nav class="nav-links">
  {% for item in page.nav %}
    <a class="nav-link{% if item.active %} active{% endif %}" href="{{ item.href }}"{% if item.external %} target="_blank" rel="noreferrer"{% endif %}>{{ item.text }}</a>
  {% endfor %}
  </nav>
  <button type="button" class="appearance-btn" aria-label="{{ site.labels.dark_mode_switch }}" data-light-title="{{ site.labels.light_mode_switch_title }}" data-dark-title="{{ site.labels.dark_mode_switch_title }}" title="{{ site.labels.dark_mode_switch_title }}">{{ site.labels.dark_mode_switch }}</button>
  {% if site.social_links %}
  <div class="social-links">
  {% for social in site.social_links %}
    <a class="social-link social-{{ social.icon }}" href="{{ social.link }}" aria-label="{{ social.icon }}" target="_blank" rel="noreferrer">{{ social.icon }}</a>
  {% endfor %}
  </div>
  {% endif %}
</header>"##;

const SIDEBAR_TEMPLATE: &str = r##"{% for group in page.sidebar %}
<section class="sidebar-group{% if group.collapsible %} collapsible{% endif %}{% if group.collapsed %} collapsed{% endif %}">
  <h2 class="sidebar-title">{{ group.text }}</h2>
  <ul class="sidebar-items">
  {% for item in group.items %}
    <li class="sidebar-item{% if item.active %} active{% endif %}">
      <a href="{{ item.href }}"{% if item.external %} target="_blank" rel="noreferrer"{% endif %}>{{ item.text }}</a>
    </li>
  {% endfor %}
  </ul>
</section>
{% endfor %}"##;
