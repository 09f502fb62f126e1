use anyhow::Context;
use tdlst_core::config::{
  AppConfig,
  Url
};

const CONFIG_TOML: &str =
  include_str!("../assets/tdlst.toml");

/// Embedded config, then `?key=value`
/// overrides from the page URL, e.g.
/// `?api.base_url=http://localhost:3000/`.
pub fn load() -> anyhow::Result<AppConfig>
{
  let mut cfg =
    AppConfig::from_toml_str(CONFIG_TOML)
      .context(
        "failed parsing embedded \
         tdlst.toml"
      )?;

  cfg
    .apply_overrides(page_overrides())
    .context(
      "failed applying page URL \
       overrides"
    )?;

  Ok(cfg)
}

fn page_overrides() -> Vec<(String, String)>
{
  let href = web_sys::window()
    .and_then(|window| {
      window.location().href().ok()
    });

  let Some(url) = href
    .as_deref()
    .and_then(|href| Url::parse(href).ok())
  else {
    return vec![];
  };

  url
    .query_pairs()
    .map(|(k, v)| {
      (k.into_owned(), v.into_owned())
    })
    .collect()
}
