//! Database schema and migrations for Gazette.
//!
//! Migrations are applied in order; the schema_version table tracks which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    username         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    email            TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password         TEXT NOT NULL,           -- Argon2 hash
    role             TEXT NOT NULL DEFAULT 'member',  -- 'member', 'admin'
    profile_picture  TEXT NOT NULL DEFAULT 'https://cdn-icons-png.flaticon.com/512/149/149071.png',
    created_at       TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: posts
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id   INTEGER REFERENCES users(id) ON DELETE SET NULL,  -- NULL for ingested posts
    title       TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,
    content     TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT 'uncategorized',
    image       TEXT NOT NULL DEFAULT 'https://images.pexels.com/photos/723072/pexels-photo-723072.jpeg?auto=compress&cs=tinysrgb&w=600',
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_author_id ON posts(author_id);
CREATE INDEX idx_posts_category ON posts(category);
CREATE INDEX idx_posts_created_at ON posts(created_at);
CREATE INDEX idx_posts_updated_at ON posts(updated_at);
"#,
    // v3: comments and likes
    r#"
CREATE TABLE comments (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id          INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content          TEXT NOT NULL,
    number_of_likes  INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_post_id ON comments(post_id);
CREATE INDEX idx_comments_created_at ON comments(created_at);

CREATE TABLE comment_likes (
    comment_id  INTEGER NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (comment_id, user_id)
);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }

    #[test]
    fn test_posts_migration_has_unique_slug() {
        let posts_migration = MIGRATIONS[1];
        assert!(posts_migration.contains("CREATE TABLE posts"));
        assert!(posts_migration.contains("slug        TEXT NOT NULL UNIQUE"));
        assert!(posts_migration.contains("category"));
        assert!(posts_migration.contains("image"));
    }

    #[test]
    fn test_comments_migration_contains_likes() {
        let comments_migration = MIGRATIONS[2];
        assert!(comments_migration.contains("CREATE TABLE comments"));
        assert!(comments_migration.contains("CREATE TABLE comment_likes"));
        assert!(comments_migration.contains("PRIMARY KEY (comment_id, user_id)"));
    }
}
