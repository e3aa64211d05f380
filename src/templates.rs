//! Minijinja template engine configuration with embedded and auto-reload modes.

use anyhow::Result;

use crate::{config::Config, http::AppEngine};

/// Page that hands the browser over to the device.
pub const REDIRECT_TEMPLATE: &str = "redirect.html";

/// Build the template engine for the enabled template mode.
pub fn build_engine(config: &Config) -> Result<AppEngine> {
    #[cfg(feature = "reload")]
    {
        Ok(AppEngine::from(reload_env::build_env(
            config.http_templates_path.clone(),
        )))
    }

    #[cfg(feature = "embed")]
    {
        Ok(AppEngine::from(embed_env::build_env(config.version.clone())))
    }

    #[cfg(not(any(feature = "reload", feature = "embed")))]
    {
        Ok(AppEngine::from(inline_env::build_env(config.version.clone())?))
    }
}

#[cfg(feature = "reload")]
mod reload_env {
    use minijinja::{Environment, path_loader};
    use minijinja_autoreload::AutoReloader;

    pub fn build_env(template_path: String) -> AutoReloader {
        AutoReloader::new(move |notifier| {
            let mut env = Environment::new();
            env.set_trim_blocks(true);
            env.set_lstrip_blocks(true);
            env.set_loader(path_loader(&template_path));
            notifier.set_fast_reload(true);
            notifier.watch_path(&template_path, true);
            Ok(env)
        })
    }
}

#[cfg(feature = "embed")]
mod embed_env {
    use minijinja::Environment;

    pub fn build_env(version: String) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_global("version", version);
        minijinja_embed::load_templates!(&mut env);
        env
    }
}

#[cfg(not(any(feature = "reload", feature = "embed")))]
mod inline_env {
    use minijinja::Environment;

    pub fn build_env(version: String) -> Result<Environment<'static>, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_global("version", version);
        env.add_template(
            super::REDIRECT_TEMPLATE,
            include_str!("../templates/redirect.html"),
        )?;
        Ok(env)
    }
}
