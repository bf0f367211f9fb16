/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// Every statement uses `IF NOT EXISTS`, so re-running it on startup is a
/// no-op for an existing database.
///
/// `memory_limit` comes from `Config.duckdb_memory_limit`
/// (env `AMICA_DUCKDB_MEMORY`, default `"1GB"`).
///
/// Sessions, chat messages and clients are written by the booking agent; the
/// dashboard only reads them. Wishlist rows are written by the agent and
/// updated here (status, amount, processed_at).
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SETTINGS
-- ===========================================
-- Keys stored in this table:
--   'jwt_secret'  – signing secret for session cookies when AMICA_APP_SECRET is unset
CREATE TABLE IF NOT EXISTS settings (
    key             VARCHAR PRIMARY KEY,
    value           VARCHAR NOT NULL
);

-- ===========================================
-- TENANTS (one salon account each)
-- ===========================================
CREATE TABLE IF NOT EXISTS tenants (
    id              VARCHAR PRIMARY KEY,           -- UUID
    name            VARCHAR NOT NULL,
    metadata        VARCHAR NOT NULL DEFAULT '{{}}', -- JSON object, see TenantSettings
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===========================================
-- DASHBOARD USERS (operators, not salon customers)
-- ===========================================
CREATE SEQUENCE IF NOT EXISTS dashboard_users_id_seq START 1;
CREATE TABLE IF NOT EXISTS dashboard_users (
    id                  BIGINT PRIMARY KEY DEFAULT nextval('dashboard_users_id_seq'),
    email               VARCHAR NOT NULL UNIQUE,   -- stored trimmed + lowercased
    encrypted_password  VARCHAR NOT NULL,          -- argon2id PHC string
    role                VARCHAR NOT NULL,          -- 'super_admin' | 'admin' | 'staff'
    tenant_id           VARCHAR,                   -- NULL only for super_admin
    first_name          VARCHAR,
    last_name           VARCHAR,
    active              BOOLEAN NOT NULL DEFAULT true,
    created_at          TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===========================================
-- CLIENTS (salon customers known to the agent)
-- ===========================================
CREATE TABLE IF NOT EXISTS clients (
    id              VARCHAR PRIMARY KEY,
    tenant_id       VARCHAR NOT NULL,
    telegram_chat_id BIGINT,
    phone           VARCHAR,
    full_name       VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_clients_tenant ON clients(tenant_id);

-- ===========================================
-- CONVERSATION SESSIONS
-- ===========================================
CREATE SEQUENCE IF NOT EXISTS conversation_sessions_id_seq START 1;
CREATE TABLE IF NOT EXISTS conversation_sessions (
    id              BIGINT PRIMARY KEY DEFAULT nextval('conversation_sessions_id_seq'),
    session_id      VARCHAR NOT NULL UNIQUE,       -- UUID
    tenant_id       VARCHAR NOT NULL,
    user_id         VARCHAR NOT NULL,              -- clients.id
    channel         VARCHAR NOT NULL DEFAULT 'telegram',
    started_at      TIMESTAMP NOT NULL,
    ended_at        TIMESTAMP,
    duration_sec    BIGINT,
    final_status    VARCHAR NOT NULL,              -- open-ended outcome tag
    final_intent    VARCHAR,
    booking_id      VARCHAR,                       -- non-NULL = booked
    booking_amount  DOUBLE,
    messages_count  BIGINT,
    meta            VARCHAR NOT NULL DEFAULT '{{}}' -- JSON; funnel reads meta.drop_off_stage
);
CREATE INDEX IF NOT EXISTS idx_conversation_sessions_tenant_started
    ON conversation_sessions(tenant_id, started_at DESC);

-- ===========================================
-- CHAT HISTORY
-- ===========================================
CREATE SEQUENCE IF NOT EXISTS session_messages_id_seq START 1;
CREATE TABLE IF NOT EXISTS session_messages (
    id              BIGINT PRIMARY KEY DEFAULT nextval('session_messages_id_seq'),
    session_id      VARCHAR NOT NULL,
    role            VARCHAR NOT NULL,              -- 'user' | 'assistant' | 'system'
    message         VARCHAR NOT NULL,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_session_messages_session
    ON session_messages(session_id, created_at);

-- ===========================================
-- WISHLIST
-- ===========================================
CREATE SEQUENCE IF NOT EXISTS wishlist_items_id_seq START 1;
CREATE TABLE IF NOT EXISTS wishlist_items (
    id              BIGINT PRIMARY KEY DEFAULT nextval('wishlist_items_id_seq'),
    tenant_id       VARCHAR NOT NULL,
    user_id         VARCHAR NOT NULL,              -- clients.id
    item_type       VARCHAR NOT NULL,              -- 'service' | 'staff' | ...
    item_id         VARCHAR NOT NULL,
    source          VARCHAR,
    comment         VARCHAR,
    status          VARCHAR NOT NULL DEFAULT 'pending',
    amount          DOUBLE,                        -- set when converted
    meta            VARCHAR NOT NULL DEFAULT '{{}}',
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    processed_at    TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_wishlist_items_tenant_created
    ON wishlist_items(tenant_id, created_at DESC);

-- ===========================================
-- DAILY METRICS (written by the metrics collector)
-- ===========================================
CREATE TABLE IF NOT EXISTS daily_metrics (
    tenant_id        VARCHAR NOT NULL,
    day              DATE NOT NULL,
    total_sessions   BIGINT NOT NULL DEFAULT 0,
    total_bookings   BIGINT NOT NULL DEFAULT 0,
    revenue          DOUBLE NOT NULL DEFAULT 0,
    conversion_rate  DOUBLE NOT NULL DEFAULT 0,
    updated_at       TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (tenant_id, day)
);

-- ===========================================
-- LOGIN ATTEMPTS (rate limiting)
-- ===========================================
CREATE TABLE IF NOT EXISTS login_attempts (
    id              VARCHAR PRIMARY KEY,
    ip_address      VARCHAR NOT NULL,
    attempted_at    TIMESTAMP NOT NULL,
    succeeded       BOOLEAN NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_login_attempts_ip
    ON login_attempts(ip_address, attempted_at);
"#
    )
}
