//! End-to-end tests: manager → change set → scene
