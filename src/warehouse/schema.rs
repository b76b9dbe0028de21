//! Warehouse table definitions
//!
//! The production warehouse is provisioned upstream by the ingestion
//! pipeline; this DDL exists so local and test databases can be stood up
//! with the same shape.

pub const SCHEMA: &str = r#"
-- ============================================
-- PARKING LOTS & GATES
-- ============================================

-- Parking facilities ("projects" in the reporting UI)
CREATE TABLE IF NOT EXISTS lots (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Physical gates, one QR code per gate
CREATE TABLE IF NOT EXISTS gates (
    id INTEGER PRIMARY KEY,
    lot_id INTEGER NOT NULL,
    qr_code TEXT NOT NULL UNIQUE,
    FOREIGN KEY(lot_id) REFERENCES lots(id)
);

-- ============================================
-- SCAN EVENTS
-- ============================================

-- One row per QR read at a gate
CREATE TABLE IF NOT EXISTS qr_reads (
    id TEXT PRIMARY KEY,                   -- Distinct event identifier
    qr_code TEXT NOT NULL,
    source TEXT,                           -- Originating app tag; NULL/unknown = legacy
    created DATETIME NOT NULL,             -- UTC event timestamp
    FOREIGN KEY(qr_code) REFERENCES gates(qr_code)
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_qr_reads_qr_code ON qr_reads(qr_code);
CREATE INDEX IF NOT EXISTS idx_qr_reads_source ON qr_reads(source);
CREATE INDEX IF NOT EXISTS idx_qr_reads_created ON qr_reads(created);
CREATE INDEX IF NOT EXISTS idx_gates_lot ON gates(lot_id);
"#;
