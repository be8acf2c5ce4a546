// Static pieces of rendered pages: CDN links, base styles, and scripts.

pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
pub const INTER_FONT_CSS: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&display=swap";

pub const BASE_CSS: &str = "\
html { scroll-behavior: smooth; }
body { margin: 0; font-family: var(--font-family, 'Inter'), sans-serif; background: var(--background, #0f172a); color: var(--text, #e2e8f0); }
.sw-nav { position: fixed; top: 0; left: 0; right: 0; z-index: 50; display: flex; gap: 1.5rem; padding: 1rem 2rem; background: rgba(30, 41, 59, 0.8); backdrop-filter: blur(8px); }
.sw-nav a { color: inherit; text-decoration: none; opacity: 0.8; }
.sw-nav a.active { opacity: 1; font-weight: 600; }
.sw-page { min-height: 100vh; padding: 5rem 2rem 2rem; box-sizing: border-box; }
.sw-section { display: flex; flex-wrap: wrap; gap: 2rem; margin-bottom: 2rem; }
.sw-column { flex: 1 1 0; min-width: 240px; }
.sw-column img { max-width: 100%; }
.sw-button { display: inline-block; cursor: pointer; padding: 0.75rem 1.5rem; border: none; border-radius: 0.75rem; background: var(--primary, #63b3ed); color: #1a202c; font-weight: 600; }";

/// Extra styles only present in the editor preview.
pub const PREVIEW_CSS: &str = "\
[data-node-id] { outline: 1px dashed transparent; outline-offset: 2px; }
[data-node-id]:hover { outline-color: rgba(99, 179, 237, 0.6); }
[data-node-id].sw-selected { outline: 2px solid #63b3ed; }";

/// Smooth scrolling and active-link highlighting for the exported page.
pub const EXPORT_SCRIPT: &str = "\
document.addEventListener('DOMContentLoaded', () => {
  const links = document.querySelectorAll('.sw-nav a');
  links.forEach(link => link.addEventListener('click', e => {
    const target = document.querySelector(link.getAttribute('href'));
    if (target) { e.preventDefault(); target.scrollIntoView({ behavior: 'smooth' }); }
  }));
  const observer = new IntersectionObserver(entries => {
    entries.forEach(entry => {
      if (!entry.isIntersecting) return;
      links.forEach(l => l.classList.toggle('active', l.getAttribute('href') === '#' + entry.target.id));
    });
  }, { threshold: 0.5 });
  document.querySelectorAll('.sw-page').forEach(page => observer.observe(page));
});";

/// Reports selection and in-place text edits to the parent editor frame as
/// editor events (`element_selected`, `content_changed`).
pub const PREVIEW_SCRIPT: &str = "\
(() => {
  const post = message => window.parent.postMessage(message, '*');
  document.addEventListener('click', e => {
    const node = e.target.closest('[data-node-id]');
    if (!node) return;
    e.preventDefault();
    document.querySelectorAll('.sw-selected').forEach(n => n.classList.remove('sw-selected'));
    node.classList.add('sw-selected');
    post({ event: 'element_selected', id: node.dataset.nodeId });
  });
  document.addEventListener('focusout', e => {
    const node = e.target.closest('[contenteditable][data-node-id]');
    if (!node) return;
    post({ event: 'content_changed', id: node.dataset.nodeId, content: node.innerText });
  });
})();";
