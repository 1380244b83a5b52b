//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* folio default theme */

:root {
  --bg: #ffffff;
  --bg-soft: #f6f6f7;
  --text: #213547;
  --text-muted: #67676c;
  --border: #e2e2e3;
  --brand: #3451b2;
  --brand-soft: rgba(100, 108, 255, 0.14);
  --code-bg: #f6f6f7;
  --navbar-height: 64px;
  --sidebar-width: 272px;
  --outline-width: 224px;
  --content-max-width: 760px;
  --radius: 8px;
  --font-sans: system-ui, -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif;
  --font-mono: ui-monospace, SFMono-Regular, Menlo, monospace;
}

html.dark {
  --bg: #1b1b1f;
  --bg-soft: #202127;
  --text: #dfdfd6;
  --text-muted: #98989f;
  --border: #3c3f44;
  --brand: #a8b1ff;
  --brand-soft: rgba(100, 108, 255, 0.16);
  --code-bg: #161618;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-sans);
  background: var(--bg);
  color: var(--text);
  line-height: 1.7;
}

a {
  color: inherit;
  text-decoration: none;
}

/* Nav bar */
.navbar {
  position: sticky;
  top: 0;
  z-index: 30;
  display: flex;
  align-items: center;
  gap: 1.5rem;
  height: var(--navbar-height);
  padding: 0 1.5rem;
  background: var(--bg);
  border-bottom: 1px solid var(--border);
}

.nav-title {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  font-weight: 600;
  font-size: 1.1rem;
}

.nav-title .logo {
  height: 24px;
}

.nav-links {
  display: flex;
  gap: 1.25rem;
  margin-left: auto;
}

.nav-link {
  font-size: 0.9rem;
  color: var(--text-muted);
  transition: color 0.15s;
}

.nav-link:hover,
.nav-link.active {
  color: var(--brand);
}

.search-btn,
.appearance-btn,
.menu-btn {
  font: inherit;
  font-size: 0.85rem;
  padding: 0.35rem 0.75rem;
  color: var(--text-muted);
  background: var(--bg-soft);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

.social-links {
  display: flex;
  gap: 0.75rem;
}

.social-link {
  font-size: 0.85rem;
  color: var(--text-muted);
}

.local-nav {
  display: none;
}

/* Layout */
.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: calc(100vh - var(--navbar-height));
}

.layout.no-sidebar {
  grid-template-columns: 1fr;
}

.sidebar {
  position: sticky;
  top: var(--navbar-height);
  height: calc(100vh - var(--navbar-height));
  overflow-y: auto;
  padding: 1.5rem;
  background: var(--bg-soft);
  border-right: 1px solid var(--border);
}

.sidebar-group + .sidebar-group {
  margin-top: 1rem;
  padding-top: 1rem;
  border-top: 1px solid var(--border);
}

.sidebar-title {
  font-size: 0.85rem;
  font-weight: 700;
  margin-bottom: 0.25rem;
}

.sidebar-group.collapsible .sidebar-title {
  cursor: pointer;
}

.sidebar-group.collapsed .sidebar-items {
  display: none;
}

.sidebar-items {
  list-style: none;
}

.sidebar-item a {
  display: block;
  padding: 0.2rem 0;
  font-size: 0.875rem;
  color: var(--text-muted);
  transition: color 0.15s;
}

.sidebar-item a:hover,
.sidebar-item.active a {
  color: var(--brand);
}

.main {
  padding: 2rem 2.5rem 4rem;
}

.doc-container {
  display: grid;
  grid-template-columns: minmax(0, var(--content-max-width)) var(--outline-width);
  gap: 2.5rem;
}

/* Content */
.content h1 {
  font-size: 2rem;
  font-weight: 700;
  margin-bottom: 1.25rem;
}

.content h2 {
  font-size: 1.5rem;
  font-weight: 600;
  margin: 2.5rem 0 1rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
}

.content h3 {
  font-size: 1.2rem;
  font-weight: 600;
  margin: 2rem 0 0.75rem;
}

.content p,
.content ul,
.content ol,
.content table,
.content blockquote {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.25rem;
}

.content a {
  color: var(--brand);
  text-decoration: underline;
  text-underline-offset: 3px;
}

.content blockquote {
  padding-left: 1rem;
  border-left: 3px solid var(--border);
  color: var(--text-muted);
}

.content table {
  border-collapse: collapse;
  display: block;
  overflow-x: auto;
}

.content th,
.content td {
  padding: 0.5rem 1rem;
  border: 1px solid var(--border);
}

.content img {
  max-width: 100%;
}

.header-anchor {
  margin-left: 0.25rem;
  opacity: 0;
  color: var(--brand);
  text-decoration: none;
}

h1:hover .header-anchor,
h2:hover .header-anchor,
h3:hover .header-anchor {
  opacity: 1;
}

.content code {
  font-family: var(--font-mono);
  font-size: 0.875em;
  padding: 0.15rem 0.35rem;
  background: var(--code-bg);
  border-radius: 4px;
}

/* Code blocks */
.code-block {
  position: relative;
  margin-bottom: 1rem;
  background: var(--code-bg);
  border-radius: var(--radius);
  overflow: hidden;
}

.code-title {
  padding: 0.5rem 1rem;
  font-size: 0.8rem;
  color: var(--text-muted);
  border-bottom: 1px solid var(--border);
}

.code-block pre {
  padding: 1rem 1.25rem;
  overflow-x: auto;
  font-family: var(--font-mono);
  font-size: 0.85rem;
  line-height: 1.7;
}

.code-block pre code {
  padding: 0;
  background: none;
}

.code-block.line-numbers-mode pre {
  margin-left: 2.5rem;
}

.line-numbers {
  position: absolute;
  left: 0;
  bottom: 0;
  width: 2.5rem;
  padding: 1rem 0;
  font-family: var(--font-mono);
  font-size: 0.85rem;
  line-height: 1.7;
  text-align: center;
  color: var(--text-muted);
  border-right: 1px solid var(--border);
}

.line-numbers span {
  display: block;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.2rem 0.6rem;
  font-size: 0.75rem;
  color: var(--text-muted);
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 4px;
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s;
}

.code-block:hover .copy-btn {
  opacity: 1;
}

/* Doc footer */
.doc-footer {
  margin-top: 3rem;
}

.doc-meta {
  display: flex;
  justify-content: space-between;
  font-size: 0.85rem;
  color: var(--text-muted);
}

.edit-link {
  color: var(--brand);
}

.prev-next {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 1rem;
  margin-top: 1.5rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
}

.pager {
  display: flex;
  flex-direction: column;
  padding: 0.75rem 1rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

.pager:hover {
  border-color: var(--brand);
}

.pager.next {
  grid-column: 2;
  text-align: right;
}

.pager .desc {
  font-size: 0.75rem;
  color: var(--text-muted);
}

.pager .title {
  color: var(--brand);
  font-weight: 500;
}

.giscus-container {
  margin-top: 2.5rem;
}

/* Outline */
.outline {
  position: sticky;
  top: calc(var(--navbar-height) + 2rem);
  align-self: start;
  font-size: 0.85rem;
}

.outline h2 {
  font-size: 0.85rem;
  font-weight: 600;
  margin-bottom: 0.5rem;
}

.outline ul {
  list-style: none;
  border-left: 1px solid var(--border);
}

.outline li {
  padding-left: 0.75rem;
}

.outline a {
  color: var(--text-muted);
}

.outline a:hover,
.outline a.active {
  color: var(--brand);
}

.outline-level-3 {
  padding-left: 1.5rem;
}

/* Site footer */
.site-footer {
  padding: 2rem 1.5rem;
  text-align: center;
  font-size: 0.85rem;
  color: var(--text-muted);
  border-top: 1px solid var(--border);
}

/* Search */
.search-modal {
  position: fixed;
  inset: 0;
  z-index: 50;
  display: flex;
  justify-content: center;
  padding-top: 10vh;
  background: rgba(0, 0, 0, 0.5);
}

.search-modal[hidden] {
  display: none;
}

.search-panel {
  width: min(640px, 92vw);
  max-height: 70vh;
  display: flex;
  flex-direction: column;
  background: var(--bg);
  border-radius: var(--radius);
  overflow: hidden;
}

.search-bar {
  display: flex;
  padding: 0.75rem;
  border-bottom: 1px solid var(--border);
}

.search-input {
  flex: 1;
  font: inherit;
  padding: 0.5rem;
  color: var(--text);
  background: var(--bg-soft);
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

.search-reset {
  margin-left: 0.5rem;
  padding: 0 0.75rem;
  font-size: 1.1rem;
  color: var(--text-muted);
  background: none;
  border: none;
  cursor: pointer;
}

.search-results {
  flex: 1;
  overflow-y: auto;
  list-style: none;
  padding: 0.5rem;
}

.search-results li a {
  display: block;
  padding: 0.5rem 0.75rem;
  border-radius: var(--radius);
}

.search-results li.selected a,
.search-results li a:hover {
  background: var(--brand-soft);
}

.search-results .excerpt {
  display: block;
  font-size: 0.8rem;
  color: var(--text-muted);
}

.search-footer {
  display: flex;
  gap: 1rem;
  padding: 0.5rem 0.75rem;
  font-size: 0.75rem;
  color: var(--text-muted);
  border-top: 1px solid var(--border);
}

/* Not found */
.not-found {
  padding: 4rem 0;
  text-align: center;
}

.not-found .code {
  font-size: 4rem;
  font-weight: 700;
}

/* Responsive */
@media (max-width: 1200px) {
  .doc-container {
    grid-template-columns: minmax(0, 1fr);
  }

  .outline {
    display: none;
  }
}

@media (max-width: 960px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .nav-links,
  .social-links {
    display: none;
  }

  .local-nav {
    display: flex;
    justify-content: space-between;
    padding: 0.5rem 1.5rem;
    border-bottom: 1px solid var(--border);
  }

  .sidebar {
    position: fixed;
    top: var(--navbar-height);
    left: -100%;
    z-index: 40;
    width: var(--sidebar-width);
    transition: left 0.25s;
  }

  .sidebar.open {
    left: 0;
  }

  .main {
    padding: 1.5rem;
  }
}
"#;

const DEFAULT_JS: &str = r#"// folio runtime
(function() {
  'use strict';

  // Mobile menu toggle
  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.querySelector('.sidebar');

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => {
      sidebar.classList.toggle('open');
    });
  }

  // Collapsible sidebar sections
  document.querySelectorAll('.sidebar-group.collapsible .sidebar-title').forEach(title => {
    title.addEventListener('click', () => {
      title.parentElement.classList.toggle('collapsed');
    });
  });

  // Appearance switch
  const appearance = document.querySelector('.appearance-btn');
  if (appearance) {
    const root = document.documentElement;
    const sync = () => {
      const dark = root.classList.contains('dark');
      appearance.title = dark ? appearance.dataset.lightTitle : appearance.dataset.darkTitle;
    };
    sync();
    appearance.addEventListener('click', () => {
      const dark = root.classList.toggle('dark');
      localStorage.setItem('folio-appearance', dark ? 'dark' : 'light');
      sync();
    });
  }

  // Return to top
  const top = document.querySelector('.return-to-top');
  if (top) {
    top.addEventListener('click', event => {
      event.preventDefault();
      window.scrollTo({ top: 0, behavior: 'smooth' });
    });
  }

  // Copy code button for code blocks
  document.querySelectorAll('.code-block').forEach(block => {
    if (block.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const code = block.querySelector('code');
      try {
        await navigator.clipboard.writeText(code ? code.textContent : '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    block.appendChild(btn);
  });

  // Highlight the outline entry of the visible heading
  const outlineLinks = Array.from(document.querySelectorAll('.outline a'));
  if (outlineLinks.length) {
    const headings = outlineLinks
      .map(link => document.getElementById(decodeURIComponent(link.hash.slice(1))))
      .filter(Boolean);
    const onScroll = () => {
      let current = null;
      for (const heading of headings) {
        if (heading.getBoundingClientRect().top < 120) current = heading.id;
      }
      outlineLinks.forEach(link => {
        link.classList.toggle('active', decodeURIComponent(link.hash.slice(1)) === current);
      });
    };
    window.addEventListener('scroll', onScroll, { passive: true });
    onScroll();
  }

  // Local search
  const config = document.getElementById('search-config');
  const modal = document.querySelector('.search-modal');
  const searchBtn = document.querySelector('.search-btn');
  if (!config || !modal || !searchBtn) return;

  const translations = JSON.parse(config.textContent);
  const input = modal.querySelector('.search-input');
  const results = modal.querySelector('.search-results');
  let index = null;
  let selected = 0;

  const load = async () => {
    if (index) return index;
    const response = await fetch(config.dataset.index);
    index = await response.json();
    return index;
  };

  const escape = text => text.replace(/[&<>"]/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' })[c]);

  const render = async () => {
    const query = input.value.trim().toLowerCase();
    results.innerHTML = '';
    selected = 0;
    if (!query) return;

    const pages = await load();
    const hits = pages.filter(page =>
      page.title.toLowerCase().includes(query) ||
      page.headings.some(h => h.toLowerCase().includes(query)) ||
      page.content.toLowerCase().includes(query)
    ).slice(0, 20);

    if (!hits.length) {
      const li = document.createElement('li');
      li.className = 'no-results';
      li.textContent = translations.modal.no_results_text + ' "' + input.value + '"';
      results.appendChild(li);
      return;
    }

    hits.forEach((page, i) => {
      const li = document.createElement('li');
      if (i === 0) li.className = 'selected';
      const at = page.content.toLowerCase().indexOf(query);
      const excerpt = at >= 0 ? page.content.slice(Math.max(0, at - 30), at + 60) : page.description;
      li.innerHTML = '<a href="' + escape(page.url) + '"><span class="title">' + escape(page.title) +
        '</span><span class="excerpt">' + escape(excerpt || '') + '</span></a>';
      results.appendChild(li);
    });
  };

  const open = () => {
    modal.hidden = false;
    input.focus();
    load();
  };

  const close = () => {
    modal.hidden = true;
  };

  const move = delta => {
    const items = results.querySelectorAll('li:not(.no-results)');
    if (!items.length) return;
    items[selected].classList.remove('selected');
    selected = (selected + delta + items.length) % items.length;
    items[selected].classList.add('selected');
    items[selected].scrollIntoView({ block: 'nearest' });
  };

  searchBtn.addEventListener('click', open);
  modal.addEventListener('click', event => {
    if (event.target === modal) close();
  });
  modal.querySelector('.search-reset').addEventListener('click', () => {
    input.value = '';
    render();
    input.focus();
  });
  input.addEventListener('input', render);

  document.addEventListener('keydown', event => {
    if ((event.metaKey || event.ctrlKey) && event.key === 'k') {
      event.preventDefault();
      open();
      return;
    }
    if (modal.hidden) return;
    if (event.key === 'Escape') close();
    if (event.key === 'ArrowDown') { event.preventDefault(); move(1); }
    if (event.key === 'ArrowUp') { event.preventDefault(); move(-1); }
    if (event.key === 'Enter') {
      const link = results.querySelector('li.selected a');
      if (link) window.location.href = link.href;
    }
  });
})();
"#;
