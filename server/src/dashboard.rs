use axum::{
    http::header,
    response::{Html, IntoResponse},
};

pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Weather Dashboard</title>
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --online: #10b981;
            --offline: #94a3b8;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .container { max-width: 960px; margin: 0 auto; padding: 1.5rem; }
        header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        h2 { font-size: 1rem; font-weight: 600; margin-bottom: 0.75rem; }

        .card { background: var(--surface); border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem 1.25rem; margin-bottom: 1rem; }
        .device-row { display: flex; align-items: center; gap: 0.75rem; padding: 0.5rem 0; border-bottom: 1px solid var(--border); cursor: pointer; }
        .device-row:last-child { border-bottom: none; }
        .device-row:hover .device-id { color: var(--accent); }
        .dot { width: 0.6rem; height: 0.6rem; border-radius: 50%; background: var(--offline); flex-shrink: 0; }
        .dot.online { background: var(--online); }
        .device-id { font-weight: 600; }
        .device-meta { color: var(--muted); font-size: 0.875rem; flex-grow: 1; }
        .device-values { font-size: 0.875rem; white-space: nowrap; }

        .chart-title { font-size: 0.875rem; color: var(--muted); margin: 0.75rem 0 0.25rem; }
        svg.chart { width: 100%; height: auto; border: 1px solid var(--border); border-radius: 0.375rem; background: var(--surface); }
        .chart-line { fill: none; stroke: var(--accent); stroke-width: 2; }
        .chart-area { fill: var(--accent); opacity: 0.12; }
        .chart-bounds { font-size: 0.75rem; color: var(--muted); }

        form.add-device { display: flex; gap: 0.5rem; flex-wrap: wrap; }
        input { padding: 0.45rem 0.6rem; border: 1px solid var(--border); border-radius: 0.375rem; font-size: 0.875rem; }
        button { padding: 0.45rem 0.9rem; border: 1px solid var(--border); border-radius: 0.375rem; background: var(--surface); font-size: 0.875rem; cursor: pointer; }
        button:hover { border-color: var(--accent); color: var(--accent); }
        button.danger:hover { border-color: #dc2626; color: #dc2626; }
        .error { color: #dc2626; font-size: 0.875rem; margin-top: 0.5rem; }
        .empty { color: var(--muted); font-size: 0.875rem; padding: 0.5rem 0; }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>Weather Dashboard</h1>
        </header>

        <div class="card">
            <h2>Devices</h2>
            <div id="device-list"><div class="empty">Loading…</div></div>
        </div>

        <div class="card" id="detail" hidden>
            <h2 id="detail-title"></h2>
            <div id="detail-body"></div>
        </div>

        <div class="card">
            <h2>Add device</h2>
            <form class="add-device" id="add-form">
                <input name="device_id" placeholder="Device ID" maxlength="64" required>
                <input name="location" placeholder="Location" required>
                <button type="submit">Create</button>
            </form>
            <div class="error" id="add-error" hidden></div>
        </div>
    </div>

    <script>
        const fmt = v => v === null || v === undefined ? "–" : v.toFixed(1);

        async function loadDevices() {
            const res = await fetch("/api/v1/devices");
            const devices = await res.json();
            const list = document.getElementById("device-list");
            if (devices.length === 0) {
                list.innerHTML = '<div class="empty">No devices registered yet.</div>';
                return;
            }
            list.innerHTML = "";
            for (const d of devices) {
                const row = document.createElement("div");
                row.className = "device-row";
                row.innerHTML =
                    `<span class="dot ${d.is_online ? "online" : ""}"></span>` +
                    `<span class="device-id">${d.id}</span>` +
                    `<span class="device-meta">${d.location} · ${d.last_seen_formatted}</span>` +
                    `<span class="device-values">${fmt(d.last_temperature)} °C · ${fmt(d.last_humidity)} %</span>`;
                row.addEventListener("click", e => {
                    if (e.target.tagName !== "BUTTON") showDetail(d.id);
                });
                const del = document.createElement("button");
                del.className = "danger";
                del.textContent = "Delete";
                del.addEventListener("click", async () => {
                    await fetch(`/api/v1/devices/${encodeURIComponent(d.id)}`, { method: "DELETE" });
                    document.getElementById("detail").hidden = true;
                    loadDevices();
                });
                row.appendChild(del);
                list.appendChild(row);
            }
        }

        function chartSvg(chart, unit) {
            if (chart.points.length === 0) {
                return '<div class="empty">No readings yet.</div>';
            }
            const dots = chart.points.map(p =>
                `<circle cx="${p.x}" cy="${p.y}" r="2.5" fill="var(--accent)">` +
                `<title>${p.time_formatted}: ${p.value.toFixed(1)} ${unit}</title></circle>`
            ).join("");
            return `<svg class="chart" viewBox="0 0 400 120" preserveAspectRatio="none">` +
                `<path class="chart-area" d="${chart.area_path}"/>` +
                `<path class="chart-line" d="${chart.line_path}"/>` +
                dots +
                `</svg>` +
                `<div class="chart-bounds">min ${chart.min.toFixed(1)} ${unit} · max ${chart.max.toFixed(1)} ${unit}</div>`;
        }

        async function showDetail(id) {
            const res = await fetch(`/api/v1/devices/${encodeURIComponent(id)}`);
            if (!res.ok) return;
            const detail = await res.json();
            const d = detail.device;
            document.getElementById("detail-title").textContent = `${d.id} — ${d.location}`;
            document.getElementById("detail-body").innerHTML =
                `<div class="device-meta">${d.is_online ? "online" : "offline"} · last seen ${d.last_seen_formatted}</div>` +
                `<div class="chart-title">Temperature</div>` + chartSvg(detail.temperature, "°C") +
                `<div class="chart-title">Humidity</div>` + chartSvg(detail.humidity, "%");
            document.getElementById("detail").hidden = false;
        }

        document.getElementById("add-form").addEventListener("submit", async e => {
            e.preventDefault();
            const err = document.getElementById("add-error");
            err.hidden = true;
            const res = await fetch("/api/v1/devices", {
                method: "POST",
                headers: { "Content-Type": "application/x-www-form-urlencoded" },
                body: new URLSearchParams(new FormData(e.target)),
            });
            if (res.ok) {
                e.target.reset();
                loadDevices();
            } else {
                err.textContent = await res.text();
                err.hidden = false;
            }
        });

        loadDevices();
        setInterval(loadDevices, 30000);
    </script>
</body>
</html>
"##;
