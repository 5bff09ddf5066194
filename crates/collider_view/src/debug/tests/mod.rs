//! Whole-frame tests of the visualizer against an in-memory collision world
