use crate::config::WebClientConfig;
use crate::core::error::AppError;

const SDK_CDN_BASE: &str = "https://www.gstatic.com/firebasejs";

/// Renders the ES module that initialises the browser SDKs and exposes them on
/// `window.firebase`.
pub fn render_bootstrap_module(config: &WebClientConfig) -> Result<String, AppError> {
    let config_json = serde_json::to_string_pretty(config)
        .map_err(|err| AppError::internal(format!("failed to serialise web config: {err}")))?;
    let sdk = |module: &str| format!("{SDK_CDN_BASE}/{}/firebase-{module}.js", config.sdk_version);

    Ok(format!(
        r#"import {{ initializeApp }} from "{app}";
import {{ getAuth }} from "{auth}";
import {{ getFirestore }} from "{firestore}";
import {{ getMessaging }} from "{messaging}";

const firebaseConfig = {config_json};

const app = initializeApp(firebaseConfig);
const auth = getAuth(app);
const db = getFirestore(app);
const messaging = getMessaging(app);

window.firebase = {{
  app,
  auth,
  db,
  messaging
}};

export {{ app, auth, db, messaging }};
"#,
        app = sdk("app"),
        auth = sdk("auth"),
        firestore = sdk("firestore"),
        messaging = sdk("messaging"),
    ))
}
