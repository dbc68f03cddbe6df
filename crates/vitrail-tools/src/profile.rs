//! Vitrail product profile: the Rails 7 + Vite + Tailwindcss data tables

use std::path::Path;

use vitrail_core::options::{CopySpec, InjectSpec, MergeSpec};
use vitrail_core::plan::{CommandInvocation, FileOperation, Position, Step};
use vitrail_core::{Flag, FlagAction, ScaffoldProfile};

/// Injected after the application class declaration so the app name is
/// available in config.
const APPLICATION_NAME_CONFIG: &str =
    "\n    config.application_name = Rails.application.class.module_parent_name";

/// Shared connection block layered into config/database.yml; resolved by
/// the generated app at boot, not by the scaffolder.
const DATABASE_CONFIG: &str = r#"
  username: <%= ENV['DATABASE_USER'] || ENV['USER'] || 'postgres' %>
  <% if ENV['DATABASE_HOST'].present? %>
  host: '<%= ENV['DATABASE_HOST'] %>'
  <% end %>
  port: <%= ENV.fetch('DATABASE_PORT', 5432) %>
"#;

/// Devise permitted-parameters callback, layered onto the generated
/// base controller.
const DEVISE_CALLBACK: &str = r#"

  before_action :configure_permitted_parameters, if: :devise_controller?

  protected

  def configure_permitted_parameters
    devise_parameter_sanitizer.permit(:sign_up) do |u|
      u.permit(:first_name, :last_name, :name, :email, :password)
    end

    devise_parameter_sanitizer.permit(:account_update) do |u|
      u.permit(:first_name, :last_name, :name, :email, :password, :password_confirmation, :current_password)
    end
  end

"#;

const GITIGNORE_BLOCK: &str = r#"
!/.env.development
!/.env.test

# Ignore yarn v4 files
.yarn/*
!.yarn/patches
!.yarn/releases
!.yarn/plugins
!.yarn/sdks
!.yarn/versions

# Ignore VSCode files
.vscode/*
!.vscode/extensions.json
!.vscode/settings.json

# Ignore RubyMine files
.idea/*

# Ignore Docker container files
db/development/
"#;

const TURBO_IMPORT: &str =
    "import { Turbo } from \"@hotwired/turbo-rails\";\n\nwindow.Turbo = Turbo;\n\n";

/// Environment files seeded on first run; user edits survive reruns
/// because these copies never overwrite.
const ENV_SEEDS: &[CopySpec] = &[
    CopySpec { src: ".env.development", dest: ".env.development", overwrite: false },
    CopySpec { src: ".env.test", dest: ".env.test", overwrite: false },
    CopySpec { src: ".envrc", dest: ".envrc", overwrite: false },
];

const YARN_SETUP: &[&[&str]] = &[
    &["corepack", "enable"],
    &["yarn", "set", "version", "berry"],
];

/// One entry per recognized flag. Variant copies overwrite so that with
/// conflicting variants the last one listed wins on shared destinations.
const FLAG_ACTIONS: &[FlagAction] = &[
    FlagAction {
        flag: Flag::Normal,
        title: "Configuring Vite with Tailwindcss (--normal)",
        copies: &[
            CopySpec { src: "vite.config.ts", dest: "vite.config.ts", overwrite: true },
            CopySpec { src: ".eslintrc.json", dest: ".eslintrc.json", overwrite: true },
        ],
        merges: &[MergeSpec { src: "app", dest: "app" }],
        injects: &[],
        commands: &[
            &["corepack", "enable"],
            &["yarn", "set", "version", "berry"],
            &["yarn", "add", "autoprefixer", "postcss", "sass", "tailwindcss", "@tailwindcss/forms"],
            &[
                "yarn", "add", "-D", "vite", "vite-plugin-ruby", "eslint", "prettier",
                "eslint-plugin-prettier", "eslint-config-prettier", "path",
                "vite-plugin-full-reload",
            ],
        ],
        tolerated_commands: &[],
        starts_containers: false,
    },
    FlagAction {
        flag: Flag::React,
        title: "Configuring Vite with React (--react)",
        copies: &[
            CopySpec { src: "vite.config-react.ts", dest: "vite.config.ts", overwrite: true },
            CopySpec { src: ".eslintrc-react.json", dest: ".eslintrc.json", overwrite: true },
        ],
        merges: &[MergeSpec { src: "app-react", dest: "app" }],
        injects: &[],
        commands: &[
            &["corepack", "enable"],
            &["yarn", "set", "version", "berry"],
            &[
                "yarn", "add", "autoprefixer", "postcss", "sass", "tailwindcss", "react",
                "react-dom", "@headlessui/react", "@heroicons/react", "@tailwindcss/forms",
            ],
            &[
                "yarn", "add", "-D", "vite", "vite-plugin-ruby", "@vitejs/plugin-react-refresh",
                "eslint", "prettier", "eslint-plugin-prettier", "eslint-config-prettier",
                "eslint-plugin-react", "path", "vite-plugin-full-reload",
            ],
        ],
        tolerated_commands: &[],
        starts_containers: false,
    },
    FlagAction {
        flag: Flag::Vue,
        title: "Configuring Vite with Vue (--vue)",
        copies: &[
            CopySpec { src: "vite.config-vue.ts", dest: "vite.config.ts", overwrite: true },
            CopySpec { src: ".eslintrc-vue.json", dest: ".eslintrc.json", overwrite: true },
        ],
        merges: &[MergeSpec { src: "app-vue", dest: "app" }],
        injects: &[],
        commands: &[
            &["corepack", "enable"],
            &["yarn", "set", "version", "berry"],
            &[
                "yarn", "add", "autoprefixer", "postcss", "sass", "tailwindcss", "vue",
                "@tailwindcss/forms",
            ],
            &[
                "yarn", "add", "-D", "vite", "vite-plugin-ruby", "@vitejs/plugin-vue",
                "@vue/compiler-sfc", "eslint", "prettier", "eslint-plugin-prettier",
                "eslint-config-prettier", "eslint-plugin-vue", "path", "vite-plugin-full-reload",
            ],
        ],
        tolerated_commands: &[],
        starts_containers: false,
    },
    FlagAction {
        flag: Flag::Hotwired,
        title: "Adding Hotwired and Stimulus (--hotwired)",
        copies: &[],
        merges: &[MergeSpec { src: "hotwired-generator", dest: "lib/generators" }],
        injects: &[InjectSpec {
            target: "app/frontend/entrypoints/application.js",
            anchor: "import \"./main.scss\";",
            payload: TURBO_IMPORT,
            position: Position::Before,
        }],
        commands: &[
            &["bundle", "add", "stimulus-rails", "turbo-rails"],
            &["yarn", "add", "@hotwired/stimulus", "@hotwired/turbo-rails"],
        ],
        tolerated_commands: &[],
        starts_containers: false,
    },
    FlagAction {
        flag: Flag::DockerEssential,
        title: "Configuring Docker with postgres & redis (--docker-essential)",
        copies: &[
            CopySpec { src: "docker-compose.essential.yml", dest: "docker-compose.yml", overwrite: true },
            CopySpec { src: ".env.development", dest: ".env.development", overwrite: false },
            CopySpec { src: ".env.test", dest: ".env.test", overwrite: false },
            CopySpec { src: ".envrc", dest: ".envrc", overwrite: false },
        ],
        merges: &[],
        injects: &[],
        commands: &[],
        tolerated_commands: &[&["direnv", "allow"]],
        starts_containers: true,
    },
    FlagAction {
        flag: Flag::DockerWithAdmin,
        title: "Configuring Docker with postgres, redis, adminer & redis-commander (--docker-with-admin)",
        copies: &[
            CopySpec { src: "docker-compose.with-admin.yml", dest: "docker-compose.yml", overwrite: true },
            CopySpec { src: ".env.development", dest: ".env.development", overwrite: false },
            CopySpec { src: ".env.test", dest: ".env.test", overwrite: false },
            CopySpec { src: ".envrc", dest: ".envrc", overwrite: false },
        ],
        merges: &[],
        injects: &[],
        commands: &[],
        tolerated_commands: &[&["direnv", "allow"]],
        starts_containers: true,
    },
    FlagAction {
        flag: Flag::Docker,
        title: "Configuring Docker with postgres, redis, adminer, redis-commander & mailhog (--docker)",
        copies: &[
            CopySpec { src: "docker-compose.yml", dest: "docker-compose.yml", overwrite: true },
            CopySpec { src: ".env.development", dest: ".env.development", overwrite: false },
            CopySpec { src: ".env.test", dest: ".env.test", overwrite: false },
            CopySpec { src: ".envrc", dest: ".envrc", overwrite: false },
        ],
        merges: &[],
        injects: &[],
        commands: &[],
        tolerated_commands: &[&["direnv", "allow"]],
        starts_containers: true,
    },
];

/// Vitrail product configuration.
#[derive(Clone)]
pub struct VitrailProfile;

impl ScaffoldProfile for VitrailProfile {
    fn name(&self) -> &'static str {
        "vitrail"
    }

    fn display_name(&self) -> &'static str {
        "Vitrail - Rails 7 + ViteJS + Tailwindcss"
    }

    fn cli_description(&self) -> &'static str {
        "Scaffold a Rails 7 + ViteJS + Tailwindcss application"
    }

    fn default_template_url(&self) -> &'static str {
        "https://github.com/vitrail-dev/vitrail-template"
    }

    fn template_url_env(&self) -> &'static str {
        "VITRAIL_TEMPLATE_URL"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install vitrail-tools --force"
    }

    fn prelude_steps(&self) -> Vec<Step> {
        vec![Step::new("Installing base gems")
            .command(CommandInvocation::fatal(&[
                "bundle", "add", "ruby-vips", "devise", "name_of_person",
            ]))
            .command(CommandInvocation::fatal(&[
                "bundle", "add", "annotate", "--group", "development",
            ]))]
    }

    fn framework_steps(&self) -> Vec<Step> {
        vec![
            Step::new("Configuring application name").file(FileOperation::inject_after(
                "config/application.rb",
                "class Application < Rails::Application",
                APPLICATION_NAME_CONFIG,
            )),
            Step::new("Installing Vite")
                .command(CommandInvocation::fatal(&[
                    "bundle", "add", "vite_rails", "vite_ruby",
                ]))
                .file(FileOperation::merge("config", "config")),
            Step::new("Generating Pages controller")
                .command(CommandInvocation::tolerated(&[
                    "bin/rails", "generate", "controller", "Pages", "home",
                ]))
                .file(FileOperation::inject_after(
                    "config/routes.rb",
                    "Rails.application.routes.draw do",
                    "\n  root to: 'pages#home'",
                )),
            Step::new("Copying version files").file(FileOperation::copy(
                ".node-version",
                ".node-version",
            )),
        ]
    }

    fn flag_actions(&self) -> &'static [FlagAction] {
        FLAG_ACTIONS
    }

    fn base_template_steps(&self) -> Vec<Step> {
        let mut copy_step = Step::new("Copying base templates")
            .file(FileOperation::copy("Procfile.dev", "Procfile.dev"))
            .file(FileOperation::copy("jsconfig.json", "jsconfig.json"))
            .file(FileOperation::copy("tailwind.config.js", "tailwind.config.js"))
            .file(FileOperation::copy("postcss.config.js", "postcss.config.js"));
        for seed in ENV_SEEDS {
            copy_step = copy_step.file(FileOperation::Copy {
                src: seed.src.into(),
                dest: seed.dest.into(),
                overwrite: seed.overwrite,
            });
        }
        copy_step = copy_step
            .command(CommandInvocation::tolerated(&["direnv", "allow"]))
            .file(FileOperation::merge("config", "config"))
            .file(FileOperation::merge("lib", "lib"))
            .file(FileOperation::merge("script", "script"))
            .command(CommandInvocation::tolerated(&["sh", "-c", "chmod +x script/*"]))
            .file(FileOperation::rename_extension("lib/templates", "txt", "tt"));

        let mut toolchain_step = Step::new("Setting up Yarn and Vite");
        for argv in YARN_SETUP {
            toolchain_step = toolchain_step.command(CommandInvocation::fatal(argv));
        }
        toolchain_step =
            toolchain_step.command(CommandInvocation::fatal(&["bundle", "exec", "vite", "install"]));

        vec![copy_step, toolchain_step]
    }

    fn integration_steps(&self) -> Vec<Step> {
        vec![
            Step::new("Configuring database")
                .file(FileOperation::inject_after(
                    "config/database.yml",
                    "adapter: postgresql",
                    DATABASE_CONFIG,
                ))
                .command(CommandInvocation::tolerated(&["bin/rails", "db:setup"])),
            Step::new("Setting up authentication")
                .command(CommandInvocation::tolerated(&[
                    "bin/rails", "generate", "devise:install",
                ]))
                .command(CommandInvocation::tolerated(&[
                    "bin/rails", "generate", "devise", "user",
                ]))
                .command(CommandInvocation::tolerated(&[
                    "bin/rails", "generate", "migration", "AddNameFieldsToUser", "first_name",
                    "last_name",
                ]))
                .file(FileOperation::inject_after(
                    "app/models/user.rb",
                    ":validatable",
                    "\n\n  has_person_name",
                ))
                .file(FileOperation::inject_after(
                    "app/controllers/application_controller.rb",
                    "class ApplicationController < ActionController::Base",
                    DEVISE_CALLBACK,
                )),
            Step::new("Updating .gitignore").file(FileOperation::inject_after(
                ".gitignore",
                "/.env*",
                GITIGNORE_BLOCK,
            )),
            Step::new("Setting up storage and annotations")
                .command(CommandInvocation::tolerated(&[
                    "bin/rails", "active_storage:install",
                ]))
                .command(CommandInvocation::tolerated(&["bin/rails", "g", "annotate:install"]))
                .file(FileOperation::inject_after(
                    "config/application.rb",
                    "config.load_defaults 7.0",
                    "\n\n    config.active_storage.variant_processor = :vips",
                ))
                .command(CommandInvocation::tolerated(&["bin/rails", "db:migrate"])),
        ]
    }

    fn finalize_steps(&self) -> Vec<Step> {
        vec![Step::new("Creating initial commit")
            .command(CommandInvocation::tolerated(&["git", "add", "."]))
            .command(CommandInvocation::tolerated(&[
                "git", "commit", "-m", "Initial commit",
            ]))]
    }

    fn summary_line(&self, flag: Flag) -> Option<&'static str> {
        match flag {
            Flag::Normal => Some("Rails 7 + ViteJS + Tailwindcss created!"),
            Flag::React => Some("Rails 7 + ReactJS 18 + ViteJS + Tailwindcss created!"),
            Flag::Vue => Some("Rails 7 + Vue 3 + ViteJS + Tailwindcss created!"),
            Flag::Hotwired => Some("Hotwired + Stimulus were added successfully"),
            Flag::DockerEssential => Some("Docker services configured: postgres & redis"),
            Flag::DockerWithAdmin => {
                Some("Docker services configured: postgres, redis, adminer & redis-commander")
            }
            Flag::Docker => Some(
                "Docker services configured: postgres, redis, adminer, redis-commander & mailhog",
            ),
        }
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        if std::env::current_dir().ok().as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }
        steps.push("# Update config/database.yml with your database credentials".to_string());
        steps.push("bin/rails s".to_string());
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrail_core::fsops::{FileOpEngine, OpOutcome};
    use vitrail_core::plan::{Plan, PlanItem};
    use vitrail_core::{report, OptionSet};

    fn flags(raw: &[&str]) -> OptionSet {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        OptionSet::parse(&raw)
    }

    #[test]
    fn test_every_flag_has_a_table_entry() {
        for flag in [
            Flag::Normal,
            Flag::React,
            Flag::Vue,
            Flag::Hotwired,
            Flag::Docker,
            Flag::DockerEssential,
            Flag::DockerWithAdmin,
        ] {
            assert!(
                FLAG_ACTIONS.iter().any(|a| a.flag == flag),
                "no flag action for {flag}"
            );
        }
    }

    #[test]
    fn test_vue_with_essential_docker_plan() {
        let options = flags(&["--vue", "--docker-essential"]);
        let plan = Plan::build(&VitrailProfile, &options);

        let copies: Vec<String> = plan
            .steps
            .iter()
            .flat_map(|s| s.items.iter())
            .filter_map(|item| match item {
                PlanItem::File(FileOperation::Copy { src, .. }) => {
                    Some(src.display().to_string())
                }
                _ => None,
            })
            .collect();

        assert!(copies.contains(&"vite.config-vue.ts".to_string()));
        assert!(copies.contains(&"docker-compose.essential.yml".to_string()));
        assert!(!copies.contains(&"vite.config-react.ts".to_string()));

        let container_starts = plan
            .steps
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|item| matches!(item, PlanItem::StartContainers(_)))
            .count();
        assert_eq!(container_starts, 1);
    }

    #[test]
    fn test_vue_with_essential_docker_summary_lines() {
        let options = flags(&["--vue", "--docker-essential"]);
        let lines = report::summary_lines(&VitrailProfile, &options);
        assert_eq!(
            lines,
            vec![
                "Rails 7 + Vue 3 + ViteJS + Tailwindcss created!",
                "Docker services configured: postgres & redis",
            ]
        );
    }

    #[test]
    fn test_variant_copies_overwrite_for_last_wins_policy() {
        for action in FLAG_ACTIONS.iter().filter(|a| a.flag.is_variant()) {
            for copy in action.copies {
                assert!(copy.overwrite, "{}: {} must overwrite", action.flag, copy.src);
            }
        }
    }

    #[test]
    fn test_env_seeds_never_overwrite() {
        for seed in ENV_SEEDS {
            assert!(!seed.overwrite);
        }
    }

    #[test]
    fn test_finalize_commands_are_tolerated() {
        for step in VitrailProfile.finalize_steps() {
            for item in &step.items {
                if let PlanItem::Command(invocation) = item {
                    assert!(!invocation.fatal_on_error);
                }
            }
        }
    }

    #[test]
    fn test_rails_generators_and_db_tasks_are_tolerated() {
        for step in VitrailProfile.integration_steps() {
            for item in &step.items {
                if let PlanItem::Command(invocation) = item {
                    assert!(
                        !invocation.fatal_on_error,
                        "`{invocation}` should be tolerated"
                    );
                }
            }
        }
    }

    #[test]
    fn test_plan_order_matches_fixed_sequence() {
        let options = flags(&["--normal"]);
        let plan = Plan::build(&VitrailProfile, &options);
        let titles: Vec<&str> = plan.steps.iter().map(|s| s.title.as_str()).collect();

        let gems = titles.iter().position(|t| *t == "Installing base gems").unwrap();
        let variant = titles
            .iter()
            .position(|t| t.contains("--normal"))
            .unwrap();
        let base = titles
            .iter()
            .position(|t| *t == "Copying base templates")
            .unwrap();
        let auth = titles
            .iter()
            .position(|t| *t == "Setting up authentication")
            .unwrap();
        let commit = titles
            .iter()
            .position(|t| *t == "Creating initial commit")
            .unwrap();

        assert!(gems < variant);
        assert!(variant < base);
        assert!(base < auth);
        assert!(auth < commit);
    }

    /// Re-applying every file operation of the plan must not duplicate
    /// injected text or clobber seeded files.
    #[tokio::test]
    async fn test_file_operations_are_rerun_safe() {
        let bundle = tempfile::TempDir::new().unwrap();
        let target = tempfile::TempDir::new().unwrap();

        // Minimal bundle assets referenced by the --normal plan.
        for rel in [
            "Procfile.dev",
            "jsconfig.json",
            "tailwind.config.js",
            "postcss.config.js",
            ".env.development",
            ".env.test",
            ".envrc",
            ".node-version",
            "vite.config.ts",
            ".eslintrc.json",
        ] {
            std::fs::write(bundle.path().join(rel), format!("{rel}\n")).unwrap();
        }
        std::fs::create_dir_all(bundle.path().join("config")).unwrap();
        std::fs::write(bundle.path().join("config/vite.json"), "{}\n").unwrap();
        std::fs::create_dir_all(bundle.path().join("app/frontend/entrypoints")).unwrap();
        std::fs::write(
            bundle.path().join("app/frontend/entrypoints/application.js"),
            "import \"./main.scss\";\n",
        )
        .unwrap();
        std::fs::create_dir_all(bundle.path().join("lib/templates/erb")).unwrap();
        std::fs::write(bundle.path().join("lib/templates/erb/model.rb.txt"), "x\n").unwrap();
        std::fs::create_dir_all(bundle.path().join("script")).unwrap();
        std::fs::write(bundle.path().join("script/setup"), "#!/bin/sh\n").unwrap();

        // Minimal generated tree the injections anchor into.
        std::fs::create_dir_all(target.path().join("config")).unwrap();
        std::fs::create_dir_all(target.path().join("app/models")).unwrap();
        std::fs::create_dir_all(target.path().join("app/controllers")).unwrap();
        std::fs::write(
            target.path().join("config/application.rb"),
            "module Demo\n  class Application < Rails::Application\n    config.load_defaults 7.0\n  end\nend\n",
        )
        .unwrap();
        std::fs::write(
            target.path().join("config/routes.rb"),
            "Rails.application.routes.draw do\nend\n",
        )
        .unwrap();
        std::fs::write(
            target.path().join("config/database.yml"),
            "default:\n  adapter: postgresql\n",
        )
        .unwrap();
        std::fs::write(
            target.path().join("app/models/user.rb"),
            "class User\n  devise :validatable\nend\n",
        )
        .unwrap();
        std::fs::write(
            target.path().join("app/controllers/application_controller.rb"),
            "class ApplicationController < ActionController::Base\nend\n",
        )
        .unwrap();
        std::fs::write(target.path().join(".gitignore"), "/.env*\n/log\n").unwrap();

        let options = flags(&["--normal"]);
        let plan = Plan::build(&VitrailProfile, &options);
        let engine = FileOpEngine::new(bundle.path(), target.path());

        let file_ops: Vec<&FileOperation> = plan
            .steps
            .iter()
            .flat_map(|s| s.items.iter())
            .filter_map(|item| match item {
                PlanItem::File(op) => Some(op),
                _ => None,
            })
            .collect();

        for op in &file_ops {
            engine.apply(op).await.unwrap();
        }
        let database_yml =
            std::fs::read_to_string(target.path().join("config/database.yml")).unwrap();
        let gitignore = std::fs::read_to_string(target.path().join(".gitignore")).unwrap();

        // Second full pass: every operation must succeed as applied or
        // skipped, and injected text must not duplicate.
        for op in &file_ops {
            let outcome = engine.apply(op).await.unwrap();
            assert!(matches!(
                outcome,
                OpOutcome::Applied | OpOutcome::Skipped(_)
            ));
        }
        assert_eq!(
            std::fs::read_to_string(target.path().join("config/database.yml")).unwrap(),
            database_yml
        );
        assert_eq!(
            std::fs::read_to_string(target.path().join(".gitignore")).unwrap(),
            gitignore
        );
    }
}
