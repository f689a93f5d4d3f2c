//! Interactive plugin skeleton generator.
//!
//! Every generated component is linked into its host right away, so a new
//! plugin is live in development mode as soon as `init` finishes. Nothing is
//! rolled back on failure; directories created before the error stay.

use crate::error::Result;
use crate::installer::{InstallMode, Installer, Outcome};
use crate::planner::PlannedComponent;
use crate::registry::HostRegistry;
use crate::templates::{
    BACKEND_PLUGIN, EDITORCONFIG, FRONTEND_EXTENDS, FRONTEND_INDEX, FRONTEND_PACKAGE,
    FRONTEND_ROUTES, GITIGNORE, TemplateContext, TemplateEngine,
};
use bitcart_core::cli::validate_path_segment;
use bitcart_core::{ComponentType, ConfigStore, Manifest, Prompter, Question};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What the generator created.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// Absolute plugin root
    pub root: PathBuf,
    /// Manifest written to the root
    pub manifest: Manifest,
    /// Host links, one per component
    pub links: Vec<Outcome>,
}

fn ask_name(prompter: &dyn Prompter, message: impl Into<String>) -> Result<String> {
    let question = Question::new(message)
        .required()
        .validate_with(validate_path_segment);
    Ok(prompter.ask(&question)?)
}

/// Creates a plugin skeleton in `target` from the operator's answers.
///
/// Questions go through the registry's prompter. When `persist_to` is given,
/// host paths entered along the way are saved at the end.
///
/// # Errors
///
/// Returns the first prompt, host resolution, template or I/O error.
pub fn scaffold_plugin(
    target: &Path,
    registry: &mut HostRegistry<'_>,
    installer: &Installer,
    persist_to: Option<&ConfigStore>,
) -> Result<ScaffoldReport> {
    let root = std::path::absolute(target)?;
    fs::create_dir_all(&root)?;
    let prompter = registry.prompter();

    let name = ask_name(prompter, "Plugin name")?;
    let author = ask_name(prompter, "Author")?;
    let description = prompter.ask(&Question::new("Description"))?;

    let labels = ComponentType::ALL.map(|kind| kind.as_str());
    let selected = prompter.select_many("Select components to create", &labels)?;

    let engine = TemplateEngine::new()?;
    let mut manifest = Manifest::new(&name, &author, description);
    let mut links = Vec::new();

    for (index, kind) in ComponentType::ALL.into_iter().enumerate() {
        if !selected.contains(&index) {
            continue;
        }

        let component_name = ask_name(
            prompter,
            format!("Enter name of your {kind} component (i.e. name of the subfolder)"),
        )?;
        let host = registry.resolve(kind)?;

        let relative = format!("src/{kind}/{component_name}");
        let path = root.join(&relative);
        fs::create_dir_all(&path)?;
        let context = TemplateContext {
            name: &component_name,
            author: &author,
        };
        write_component_files(&engine, kind, &path, &context)?;

        let component = PlannedComponent {
            path,
            name: component_name,
            kind,
        };
        let link = installer.install(&component, &host, &author, InstallMode::Link)?;
        info!("Linked {} into {}", relative, link.final_path.display());
        manifest.push_install(relative, kind);
        links.push(link);
    }

    manifest.write(&root)?;
    let context = TemplateContext {
        name: &name,
        author: &author,
    };
    fs::write(root.join(".gitignore"), engine.render(GITIGNORE, &context)?)?;
    fs::write(root.join(".editorconfig"), EDITORCONFIG)?;

    if let Some(store) = persist_to {
        registry.persist(store)?;
    }

    Ok(ScaffoldReport {
        root,
        manifest,
        links,
    })
}

fn write_component_files(
    engine: &TemplateEngine<'_>,
    kind: ComponentType,
    dir: &Path,
    context: &TemplateContext<'_>,
) -> Result<()> {
    let files: &[(&str, &str)] = match kind {
        ComponentType::Backend => &[("plugin.py", BACKEND_PLUGIN)],
        ComponentType::Admin | ComponentType::Store => &[
            ("index.js", FRONTEND_INDEX),
            ("package.json", FRONTEND_PACKAGE),
            ("config/extends.js", FRONTEND_EXTENDS),
            ("config/routes.js", FRONTEND_ROUTES),
        ],
        ComponentType::Docker => &[],
    };

    for (file, template) in files {
        let path = dir.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, engine.render(template, context)?)?;
        debug!("Rendered {}", path.display());
    }

    if kind == ComponentType::Backend {
        fs::write(dir.join("__init__.py"), "")?;
    }
    Ok(())
}
