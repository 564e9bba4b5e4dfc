use crate::error::{Result, SwitcherError};
use std::path::Path;
use tokio::process::Command;
use url::Url;

/// Placeholder replaced by the absolute image path
const PATH_PLACEHOLDER: &str = "%f";

/// Placeholder replaced by the image's `file://` URI
const URI_PLACEHOLDER: &str = "%u";

/// Words separating consecutive commands in a template
const SEPARATORS: [&str; 2] = [";", "&&"];

/// Command template used when the configuration does not provide one
pub fn default_command() -> &'static str {
    if cfg!(target_os = "windows") {
        concat!(
            r#"reg add "HKCU\Control Panel\Desktop" /v WallpaperStyle /t REG_SZ /d 10 /f ; "#,
            r#"reg add "HKCU\Control Panel\Desktop" /v TileWallpaper /t REG_SZ /d 0 /f ; "#,
            r#"reg add "HKCU\Control Panel\Desktop" /v Wallpaper /t REG_SZ /d %f /f ; "#,
            r#"RUNDLL32.EXE user32.dll,UpdatePerUserSystemParameters"#
        )
    } else if cfg!(target_os = "macos") {
        concat!(
            "osascript -e 'on run argv' ",
            r#"-e 'tell application "System Events" to tell every desktop to set picture to (item 1 of argv)' "#,
            "-e 'end run' %f"
        )
    } else {
        concat!(
            "gsettings set org.gnome.desktop.background picture-uri %u ; ",
            "gsettings set org.gnome.desktop.background picture-uri-dark %u ; ",
            "gsettings set org.gnome.desktop.background picture-options zoom"
        )
    }
}

/// Splits a template into program invocations and fills in the image path.
///
/// The template is word-split before substitution, so the path always lands
/// inside a single argument and is never interpreted by a shell.
pub fn render_command(template: &str, image_path: &Path) -> Result<Vec<Vec<String>>> {
    let words = shell_words::split(template)
        .map_err(|e| SwitcherError::InvalidConfig(format!("wallpaper command: {}", e)))?;

    let path = image_path.display().to_string();
    let uri = Url::from_file_path(image_path)
        .map_err(|_| {
            SwitcherError::Wallpaper(format!("{} is not an absolute path", image_path.display()))
        })?
        .to_string();

    let mut invocations = Vec::new();
    let mut current = Vec::new();
    for word in words {
        if SEPARATORS.contains(&word.as_str()) {
            if !current.is_empty() {
                invocations.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(
            word.replace(URI_PLACEHOLDER, &uri)
                .replace(PATH_PLACEHOLDER, &path),
        );
    }
    if !current.is_empty() {
        invocations.push(current);
    }

    if invocations.is_empty() {
        return Err(SwitcherError::InvalidConfig(
            "wallpaper command is empty".to_string(),
        ));
    }
    Ok(invocations)
}

/// Installs `image_path` as the desktop background
pub async fn set_as_wallpaper(image_path: &Path, template: Option<&str>) -> Result<()> {
    let absolute = std::path::absolute(image_path)?;
    ::log::info!("Setting {} as wallpaper...", absolute.display());

    let invocations = render_command(template.unwrap_or(default_command()), &absolute)?;
    for argv in &invocations {
        let line = shell_words::join(argv);
        ::log::debug!("Executing: {}", line);

        let status = Command::new(&argv[0]).args(&argv[1..]).status().await?;
        if !status.success() {
            return Err(SwitcherError::Wallpaper(format!(
                "`{}` exited with {}",
                line, status
            )));
        }
    }

    ::log::info!("Wallpaper set.");
    Ok(())
}
