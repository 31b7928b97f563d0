//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Uniqueness is enforced here, not in
//! application code: slugs, tag names, usernames, emails, follow edges and
//! favorite edges all carry a UNIQUE or PRIMARY KEY constraint.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    bio           TEXT,
    image         TEXT,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    article_id  INTEGER PRIMARY KEY,
    slug        TEXT NOT NULL UNIQUE,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    body        TEXT NOT NULL,
    author_id   INTEGER NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Global vocabulary. Rows are never deleted.
CREATE TABLE IF NOT EXISTS tags (
    tag_id INTEGER PRIMARY KEY,
    name   TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS article_tags (
    article_id INTEGER NOT NULL REFERENCES articles(article_id),
    tag_id     INTEGER NOT NULL REFERENCES tags(tag_id),
    PRIMARY KEY (article_id, tag_id)
);

CREATE TABLE IF NOT EXISTS follows (
    follower_id INTEGER NOT NULL REFERENCES users(user_id),
    followed_id INTEGER NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (follower_id, followed_id)
);

CREATE TABLE IF NOT EXISTS favorites (
    user_id    INTEGER NOT NULL REFERENCES users(user_id),
    article_id INTEGER NOT NULL REFERENCES articles(article_id),
    PRIMARY KEY (user_id, article_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY,
    body       TEXT NOT NULL,
    article_id INTEGER NOT NULL REFERENCES articles(article_id),
    author_id  INTEGER NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS articles_author_idx   ON articles(author_id);
CREATE INDEX IF NOT EXISTS articles_created_idx  ON articles(created_at);
CREATE INDEX IF NOT EXISTS article_tags_tag_idx  ON article_tags(tag_id);
CREATE INDEX IF NOT EXISTS follows_followed_idx  ON follows(followed_id);
CREATE INDEX IF NOT EXISTS favorites_article_idx ON favorites(article_id);
CREATE INDEX IF NOT EXISTS comments_article_idx  ON comments(article_id);

PRAGMA user_version = 1;
";
