pub mod neural_canvas;
