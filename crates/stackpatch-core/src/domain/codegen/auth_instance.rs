//! `lib/auth.ts`: the Better Auth server instance.
//!
//! [`AuthInstanceOptions::new`] is the only way to build the options, and it
//! normalizes the config first, so a stateless session can never reach the
//! adapter branches. [`render`] additionally strips database imports from
//! stateless output as a second, independent check.

use super::ts_header;
use crate::domain::{
    AuthConfig,
    value_objects::{DatabaseKind, OAuthProvider, OrmKind},
};

/// Import sources that only appear when a database adapter is emitted.
pub const DATABASE_IMPORT_SOURCES: &[&str] = &[
    "better-auth/adapters/",
    "drizzle-orm",
    "@prisma/client",
    "\"pg\"",
    "mysql2",
    "better-sqlite3",
    "\"mongodb\"",
];

/// Database wiring for the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseAdapter {
    Drizzle(DatabaseKind),
    Prisma(DatabaseKind),
    Raw(DatabaseKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInstanceOptions {
    adapter: Option<DatabaseAdapter>,
    stateless: bool,
    email_password: bool,
    providers: Vec<OAuthProvider>,
}

impl AuthInstanceOptions {
    pub fn new(config: &AuthConfig) -> Self {
        let config = config.normalized();
        let adapter = if config.uses_database_adapter() {
            match config.orm {
                OrmKind::Drizzle => Some(DatabaseAdapter::Drizzle(config.database)),
                OrmKind::Prisma => Some(DatabaseAdapter::Prisma(config.database)),
                OrmKind::Raw => Some(DatabaseAdapter::Raw(config.database)),
                OrmKind::None => None,
            }
        } else {
            None
        };

        Self {
            adapter,
            stateless: config.is_stateless(),
            email_password: config.email_password,
            providers: config.oauth_providers,
        }
    }

    pub fn adapter(&self) -> Option<DatabaseAdapter> {
        self.adapter
    }

    pub fn is_stateless(&self) -> bool {
        self.stateless
    }
}

/// Import lines, setup statements and the `database:` expression.
struct AdapterCode {
    imports: Vec<&'static str>,
    setup: Vec<&'static str>,
    database: String,
}

fn adapter_code(adapter: DatabaseAdapter) -> AdapterCode {
    match adapter {
        DatabaseAdapter::Drizzle(DatabaseKind::Mongodb) | DatabaseAdapter::Raw(DatabaseKind::Mongodb) => {
            AdapterCode {
                imports: vec![
                    "import { MongoClient } from \"mongodb\";",
                    "import { mongodbAdapter } from \"better-auth/adapters/mongodb\";",
                ],
                setup: vec![
                    "const client = new MongoClient(process.env.DATABASE_URL!);",
                    "const db = client.db();",
                ],
                database: "mongodbAdapter(db)".into(),
            }
        }
        DatabaseAdapter::Drizzle(kind) => {
            let driver = match kind {
                DatabaseKind::Mysql => "import { drizzle } from \"drizzle-orm/mysql2\";",
                DatabaseKind::Sqlite => "import { drizzle } from \"drizzle-orm/better-sqlite3\";",
                _ => "import { drizzle } from \"drizzle-orm/node-postgres\";",
            };
            AdapterCode {
                imports: vec![
                    driver,
                    "import { drizzleAdapter } from \"better-auth/adapters/drizzle\";",
                ],
                setup: vec!["const db = drizzle(process.env.DATABASE_URL!);"],
                database: format!(
                    "drizzleAdapter(db, {{ provider: \"{}\" }})",
                    kind.adapter_provider()
                ),
            }
        }
        DatabaseAdapter::Prisma(kind) => {
            let provider = match kind {
                DatabaseKind::Postgres => "postgresql",
                other => other.as_str(),
            };
            AdapterCode {
                imports: vec![
                    "import { PrismaClient } from \"@prisma/client\";",
                    "import { prismaAdapter } from \"better-auth/adapters/prisma\";",
                ],
                setup: vec!["const prisma = new PrismaClient();"],
                database: format!("prismaAdapter(prisma, {{ provider: \"{provider}\" }})"),
            }
        }
        DatabaseAdapter::Raw(DatabaseKind::Mysql) => AdapterCode {
            imports: vec!["import { createPool } from \"mysql2/promise\";"],
            setup: vec![],
            database: "createPool(process.env.DATABASE_URL!)".into(),
        },
        DatabaseAdapter::Raw(DatabaseKind::Sqlite) => AdapterCode {
            imports: vec!["import Database from \"better-sqlite3\";"],
            setup: vec![],
            database: "new Database(process.env.DATABASE_URL ?? \"sqlite.db\")".into(),
        },
        DatabaseAdapter::Raw(_) => AdapterCode {
            imports: vec!["import { Pool } from \"pg\";"],
            setup: vec![],
            database: "new Pool({ connectionString: process.env.DATABASE_URL })".into(),
        },
    }
}

pub fn render(options: &AuthInstanceOptions) -> String {
    let adapter = options.adapter.map(adapter_code);

    let mut imports = vec![
        "import { betterAuth } from \"better-auth\";",
        "import { nextCookies } from \"better-auth/next-js\";",
    ];
    let mut setup: Vec<&str> = Vec::new();
    let mut body: Vec<String> = Vec::new();

    if let Some(code) = &adapter {
        imports.extend(code.imports.iter().copied());
        setup.extend(code.setup.iter().copied());
        body.push(format!("  database: {},", code.database));
    }

    if options.stateless {
        body.push(
            [
                "  session: {",
                "    cookieCache: {",
                "      enabled: true,",
                "      maxAge: 7 * 24 * 60 * 60,",
                "      strategy: \"jwe\",",
                "      refreshCache: true,",
                "    },",
                "  },",
                "  account: {",
                "    storeStateStrategy: \"cookie\",",
                "    storeAccountCookie: true,",
                "  },",
            ]
            .join("\n"),
        );
    }

    if options.email_password {
        body.push("  emailAndPassword: {\n    enabled: true,\n  },".into());
    }

    if !options.providers.is_empty() {
        let mut block = String::from("  socialProviders: {\n");
        for provider in &options.providers {
            block.push_str(&format!(
                "    {}: {{\n      clientId: process.env.{} as string,\n      clientSecret: process.env.{} as string,\n    }},\n",
                provider.as_str(),
                provider.client_id_var(),
                provider.client_secret_var(),
            ));
        }
        block.push_str("  },");
        body.push(block);
    }

    body.push("  plugins: [nextCookies()],".into());

    let mut out = ts_header();
    out.push_str(&imports.join("\n"));
    out.push_str("\n\n");
    if !setup.is_empty() {
        out.push_str(&setup.join("\n"));
        out.push_str("\n\n");
    }
    out.push_str("export const auth = betterAuth({\n");
    out.push_str(&body.join("\n"));
    out.push_str("\n});\n");

    if options.stateless {
        strip_database_imports(&out)
    } else {
        out
    }
}

/// Drop every import line that pulls in a database package.
pub fn strip_database_imports(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let is_db_import = trimmed.starts_with("import ")
            && DATABASE_IMPORT_SOURCES.iter().any(|s| trimmed.contains(s));
        if !is_db_import {
            out.push_str(line);
        }
    }
    out
}

/// Whether any database import survives in `source`.
pub fn has_database_import(source: &str) -> bool {
    source.lines().any(|line| {
        let trimmed = line.trim_start();
        trimmed.starts_with("import ") && DATABASE_IMPORT_SOURCES.iter().any(|s| trimmed.contains(s))
    })
}
