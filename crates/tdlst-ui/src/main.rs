mod app;
mod components;
mod settings;
mod storage;

use tdlst_core::config::AppConfig;

fn main() {
  console_error_panic_hook::set_once();

  let loaded = settings::load();
  let log_level = loaded
    .as_ref()
    .map(|cfg| cfg.log_level)
    .unwrap_or(tracing::Level::INFO);

  let mut layer_config =
    wasm_tracing::WasmLayerConfig::new();
  layer_config.set_max_level(log_level);
  if let Err(err) =
    wasm_tracing::set_as_global_default_with_config(
      layer_config
    )
  {
    gloo::console::error!(format!(
      "tracing already initialized: \
       {err}"
    ));
  }

  let config = match loaded {
    | Ok(config) => config,
    | Err(err) => {
      tracing::error!(
        error = ?err,
        "invalid configuration; using \
         defaults"
      );
      match AppConfig::defaults() {
        | Ok(config) => config,
        | Err(err) => {
          tracing::error!(
            error = %err,
            "built-in configuration \
             rejected; not starting"
          );
          return;
        }
      }
    }
  };

  tracing::info!(
    api = %config.api_base_url,
    "starting tdlst frontend"
  );

  let mount = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id("app")
    })
    .expect(
      "missing #app mount element"
    );

  yew::Renderer::<app::App>::with_root_and_props(
    mount,
    app::AppProps {
      config
    }
  )
  .render();
}
