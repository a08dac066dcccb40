use serial_test::serial;
use sidekick_common::LlmProvider;
use sidekick_config::SettingsLoader;
use std::fs;
use tempfile::TempDir;

/// Helper to write an env file in a temp dir.
fn write_env(tmp: &TempDir, name: &str, body: &str) {
    fs::write(tmp.path().join(name), body).expect("write env file");
}

#[test]
#[serial]
fn test_settings_load() {
    let tmp = TempDir::new().unwrap();

    // A developer's local override on top of the project defaults and the
    // checked-in example file.
    write_env(
        &tmp,
        ".env.local",
        "OPENAI_API_KEY=sk-local-override\nSIDEKICK_BROWSER_HEADLESS=false\n",
    );
    write_env(
        &tmp,
        ".env",
        "OPENAI_API_KEY=sk-project\n\
         BRAVE_API_KEY=brave-project\n\
         SIDEKICK_FETCH_CONCURRENCY=4\n",
    );
    write_env(
        &tmp,
        ".env.example",
        "OPENAI_API_KEY=sk-your-key-here\nSIDEKICK_PAGE_TIMEOUT_SECS=45\n",
    );

    temp_env::with_vars(
        [
            ("OPENAI_API_KEY", None::<&str>),
            ("BRAVE_API_KEY", None),
            ("SIDEKICK_BROWSER_HEADLESS", None),
            ("SIDEKICK_FETCH_CONCURRENCY", None),
            ("SIDEKICK_PAGE_TIMEOUT_SECS", None),
            ("SIDEKICK_LLM_PROVIDER", None),
        ],
        || {
            let settings = SettingsLoader::in_dir(tmp.path())
                .load()
                .expect("load settings");

            assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
            assert_eq!(settings.llm.api_key.as_deref(), Some("sk-local-override"));
            assert!(!settings.browser.headless);
            assert_eq!(settings.search.brave_api_key.as_deref(), Some("brave-project"));
            assert_eq!(settings.batch.concurrency, 4);
            // Only defined in the example fallback.
            assert_eq!(settings.batch.page_timeout_secs, 45);
        },
    );
}
