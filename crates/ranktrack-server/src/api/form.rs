//! The browser form. Pure presentation: a static page that posts to
//! `/api/check-rankings` and renders the JSON client-side.

use axum::response::Html;

pub(super) async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>RankTrack</title>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    body { font-family: sans-serif; max-width: 860px; margin: 0 auto; padding: 20px; color: #333; }
    h1 { font-weight: 300; }
    form { background: #f8f9fa; padding: 20px; border-radius: 8px; }
    label { display: block; margin: 12px 0 4px; font-weight: 600; }
    input, select { width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 4px; box-sizing: border-box; }
    button { margin-top: 16px; padding: 10px 24px; border: none; border-radius: 4px; background: #4a6fa5; color: white; cursor: pointer; }
    button:disabled { opacity: 0.6; }
    .result { margin: 10px 0; padding: 10px; border: 1px solid #e0e0e0; border-radius: 4px; }
    .position { font-weight: bold; color: #4a6fa5; margin-right: 8px; }
    .error { color: #a94442; background: #f2dede; padding: 10px; border-radius: 4px; }
    .warning { color: #8a6d3b; background: #fcf8e3; padding: 10px; border-radius: 4px; }
  </style>
</head>
<body>
  <h1>RankTrack</h1>
  <p>Check organic and maps rankings for a keyword at a location.</p>
  <form id="form">
    <label for="keyword">Keyword</label>
    <input id="keyword" placeholder="e.g. pizza restaurant" required>
    <label for="address">Location (address or city)</label>
    <input id="address" placeholder="e.g. New York, NY" required>
    <label for="pincode">Postal / PIN code (optional)</label>
    <input id="pincode" placeholder="e.g. 10001">
    <label for="device">Device</label>
    <select id="device">
      <option value="desktop">Desktop</option>
      <option value="mobile">Mobile</option>
    </select>
    <label for="language">Language</label>
    <select id="language">
      <option value="en">English</option>
      <option value="es">Spanish</option>
      <option value="fr">French</option>
      <option value="de">German</option>
      <option value="it">Italian</option>
    </select>
    <label for="depth">Depth</label>
    <select id="depth">
      <option value="20">Top 20</option>
      <option value="40" selected>Top 40</option>
      <option value="100">Top 100</option>
    </select>
    <button type="submit" id="submit">Check rankings</button>
  </form>
  <div id="results"></div>
  <script>
    const form = document.getElementById('form');
    const results = document.getElementById('results');
    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      document.getElementById('submit').disabled = true;
      results.textContent = 'Checking rankings...';
      const body = {
        keyword: document.getElementById('keyword').value,
        location: {
          address: document.getElementById('address').value,
          pincode: document.getElementById('pincode').value || null
        },
        device: document.getElementById('device').value,
        language_code: document.getElementById('language').value,
        depth: parseInt(document.getElementById('depth').value)
      };
      try {
        const res = await fetch('/api/check-rankings', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(body)
        });
        const data = await res.json();
        if (!res.ok) {
          results.innerHTML = '<div class="error">' + (data.message || 'request failed') + '</div>';
          return;
        }
        render(data);
      } catch (err) {
        results.innerHTML = '<div class="error">Network error: ' + err.message + '</div>';
      } finally {
        document.getElementById('submit').disabled = false;
      }
    });

    function item(r, text) {
      return '<div class="result"><span class="position">#' + r.position + '</span>' + text + '</div>';
    }

    function render(data) {
      let html = '<h2>Results for "' + data.keyword + '"</h2>';
      html += '<p>' + data.location.address + ' (' + data.location.latitude + ', '
        + data.location.longitude + ') via ' + data.location.provider
        + ' — ' + data.processing_time_seconds.toFixed(2) + 's</p>';
      for (const w of data.warnings) {
        html += '<div class="warning">' + w + '</div>';
      }
      html += '<h3>Organic (' + data.organic_results.length + ')</h3>';
      for (const r of data.organic_results) {
        html += item(r, '<strong>' + (r.domain || r.url || '') + '</strong> '
          + (r.title || '') + '<br>' + (r.description || ''));
      }
      html += '<h3>Maps (' + data.maps_results.length + ')</h3>';
      for (const r of data.maps_results) {
        html += item(r, '<strong>' + (r.title || '') + '</strong><br>'
          + (r.address || '') + (r.rating ? '<br>' + r.rating + ' stars ('
          + (r.reviews_count || 0) + ' reviews)' : ''));
      }
      results.innerHTML = html;
    }
  </script>
</body>
</html>
"#;
